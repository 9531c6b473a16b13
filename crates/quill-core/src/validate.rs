//! Input validation - the field-constraint contract for each write operation.
//!
//! Lengths are counted in characters, not bytes.

use quill_shared::dto::{CategoryInput, CommentInput, PostInput};

use crate::error::DomainError;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const CONTENT_MIN: usize = 10;
pub const EXCERPT_MAX: usize = 200;
pub const COMMENT_MIN: usize = 1;
pub const COMMENT_MAX: usize = 500;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 200;

/// Validate a post create/update body.
pub fn post_input(input: &PostInput) -> Result<(), DomainError> {
    let title_len = input.title.chars().count();
    if title_len < TITLE_MIN || title_len > TITLE_MAX {
        return Err(DomainError::validation(format!(
            "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
        )));
    }
    if input.content.chars().count() < CONTENT_MIN {
        return Err(DomainError::validation(format!(
            "content must be at least {CONTENT_MIN} characters"
        )));
    }
    if let Some(excerpt) = &input.excerpt {
        if excerpt.chars().count() > EXCERPT_MAX {
            return Err(DomainError::validation(format!(
                "excerpt must be at most {EXCERPT_MAX} characters"
            )));
        }
    }
    if input.category.is_empty() {
        return Err(DomainError::validation("category is required"));
    }
    Ok(())
}

/// Validate a comment body.
pub fn comment_input(input: &CommentInput) -> Result<(), DomainError> {
    let len = input.content.chars().count();
    if len < COMMENT_MIN || len > COMMENT_MAX {
        return Err(DomainError::validation(format!(
            "content must be between {COMMENT_MIN} and {COMMENT_MAX} characters"
        )));
    }
    Ok(())
}

/// Validate a category create/update body.
pub fn category_input(input: &CategoryInput) -> Result<(), DomainError> {
    let name_len = input.name.chars().count();
    if name_len < NAME_MIN || name_len > NAME_MAX {
        return Err(DomainError::validation(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    if let Some(description) = &input.description {
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(DomainError::validation(format!(
                "description must be at most {DESCRIPTION_MAX} characters"
            )));
        }
    }
    if let Some(color) = &input.color {
        if !is_hex_color(color) {
            return Err(DomainError::validation(
                "color must be a hex color like #RRGGBB or #RGB",
            ));
        }
    }
    Ok(())
}

/// `^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$`
fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            content: content.to_string(),
            excerpt: None,
            category: "a2f0c6d8-0000-0000-0000-000000000000".to_string(),
            tags: vec![],
            is_published: false,
        }
    }

    #[test]
    fn title_boundary_at_three_chars() {
        assert!(post_input(&post("ab", "long enough content")).is_err());
        assert!(post_input(&post("abc", "long enough content")).is_ok());
        assert!(post_input(&post(&"x".repeat(100), "long enough content")).is_ok());
        assert!(post_input(&post(&"x".repeat(101), "long enough content")).is_err());
    }

    #[test]
    fn content_needs_ten_chars() {
        assert!(post_input(&post("title", "123456789")).is_err());
        assert!(post_input(&post("title", "1234567890")).is_ok());
    }

    #[test]
    fn excerpt_capped_at_two_hundred() {
        let mut input = post("title", "1234567890");
        input.excerpt = Some("e".repeat(200));
        assert!(post_input(&input).is_ok());
        input.excerpt = Some("e".repeat(201));
        assert!(post_input(&input).is_err());
    }

    #[test]
    fn comment_boundaries() {
        let make = |len: usize| CommentInput {
            content: "c".repeat(len),
        };
        assert!(comment_input(&make(0)).is_err());
        assert!(comment_input(&make(1)).is_ok());
        assert!(comment_input(&make(500)).is_ok());
        assert!(comment_input(&make(501)).is_err());
    }

    #[test]
    fn category_name_and_description() {
        let make = |name: &str| CategoryInput {
            name: name.to_string(),
            description: None,
            color: None,
        };
        assert!(category_input(&make("T")).is_err());
        assert!(category_input(&make("Te")).is_ok());
        assert!(category_input(&make(&"n".repeat(51))).is_err());

        let mut input = make("Tech");
        input.description = Some("d".repeat(201));
        assert!(category_input(&input).is_err());
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#ABC"));
        assert!(is_hex_color("#AABBCC"));
        assert!(is_hex_color("#a1b2c3"));
        assert!(!is_hex_color("#ZZZ"));
        assert!(!is_hex_color("#ABCD"));
        assert!(!is_hex_color("AABBCC"));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 3 characters, 9 bytes
        assert!(post_input(&post("日本語", "1234567890")).is_ok());
    }
}
