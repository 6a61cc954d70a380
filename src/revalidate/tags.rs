/// Tag attached to every piece of WordPress-backed content.
pub const GLOBAL_TAG: &str = "wordpress";

/// Root path whose layout is invalidated on every webhook.
pub const LAYOUT_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Post,
    Category,
    Tag,
    /// WordPress sends either `author` or `user` for the same entity.
    Author,
    Other(String),
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        match value {
            "post" => ContentType::Post,
            "category" => ContentType::Category,
            "tag" => ContentType::Tag,
            "author" | "user" => ContentType::Author,
            other => ContentType::Other(other.to_string()),
        }
    }
}

/// Cache tags to invalidate for a change to `content_type`/`content_id`.
///
/// The global tag always comes first. Narrow per-id tags are left out when no
/// id is given; nothing stands in for them.
pub fn derive_tags(content_type: &ContentType, content_id: Option<&str>) -> Vec<String> {
    let mut tags = vec![GLOBAL_TAG.to_string()];

    match content_type {
        ContentType::Post => {
            tags.push("posts".to_string());
            if let Some(id) = content_id {
                tags.push(format!("post-{}", id));
            }
            // any post change can reshuffle the first listing page
            tags.push("posts-page-1".to_string());
        }
        ContentType::Category => {
            tags.push("categories".to_string());
            if let Some(id) = content_id {
                tags.push(format!("posts-category-{}", id));
                tags.push(format!("category-{}", id));
            }
        }
        ContentType::Tag => {
            tags.push("tags".to_string());
            if let Some(id) = content_id {
                tags.push(format!("posts-tag-{}", id));
                tags.push(format!("tag-{}", id));
            }
        }
        ContentType::Author => {
            tags.push("authors".to_string());
            if let Some(id) = content_id {
                tags.push(format!("posts-author-{}", id));
                tags.push(format!("author-{}", id));
            }
        }
        ContentType::Other(_) => {}
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(content_type: &str, content_id: Option<&str>) -> Vec<String> {
        derive_tags(&ContentType::from(content_type), content_id)
    }

    #[test]
    fn test_post_with_id() {
        assert_eq!(
            tags("post", Some("42")),
            vec!["wordpress", "posts", "post-42", "posts-page-1"]
        );
    }

    #[test]
    fn test_post_without_id_has_no_narrow_tag() {
        assert_eq!(tags("post", None), vec!["wordpress", "posts", "posts-page-1"]);
    }

    #[test]
    fn test_category() {
        assert_eq!(
            tags("category", Some("7")),
            vec!["wordpress", "categories", "posts-category-7", "category-7"]
        );
        assert_eq!(tags("category", None), vec!["wordpress", "categories"]);
    }

    #[test]
    fn test_tag() {
        assert_eq!(
            tags("tag", Some("rust")),
            vec!["wordpress", "tags", "posts-tag-rust", "tag-rust"]
        );
        assert_eq!(tags("tag", None), vec!["wordpress", "tags"]);
    }

    #[test]
    fn test_author_and_user_are_the_same() {
        let expected = vec!["wordpress", "authors", "posts-author-3", "author-3"];
        assert_eq!(tags("author", Some("3")), expected);
        assert_eq!(tags("user", Some("3")), expected);
        assert_eq!(tags("user", None), vec!["wordpress", "authors"]);
    }

    #[test]
    fn test_unknown_types_only_get_global_tag() {
        for content_type in ["page", "media", "comment", "Post", "POST", "menu_item"] {
            assert_eq!(tags(content_type, Some("9")), vec![GLOBAL_TAG]);
            assert_eq!(tags(content_type, None), vec![GLOBAL_TAG]);
        }
    }

    #[test]
    fn test_content_type_parsing() {
        assert_eq!(ContentType::from("user"), ContentType::Author);
        assert_eq!(
            ContentType::from("page"),
            ContentType::Other("page".to_string())
        );
    }
}
