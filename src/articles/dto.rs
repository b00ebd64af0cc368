use serde::{Deserialize, Serialize};

use crate::articles::repo_types::PaintingArticle;

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

/// Public view of a painting article: `id`, `title`, `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticlePublic {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl From<PaintingArticle> for ArticlePublic {
    fn from(a: PaintingArticle) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
        }
    }
}
