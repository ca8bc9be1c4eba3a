use crate::models::StoryParameters;

pub const STORY: &str = include_str!("../data/prompts/story.txt");
pub const IMAGE_DESCRIPTION: &str = include_str!("../data/prompts/image_description.txt");
pub const IMAGE_FOLLOW_UP: &str = include_str!("../data/prompts/image_follow_up.txt");

/// Prefix prepended to every chat+image provider illustration request.
pub const OPENAI_IMAGE_STYLE: &str =
    "Children's storybook illustration in colorful, friendly style. ";

/// Prefix prepended to every image-synthesis provider request.
pub const STABILITY_IMAGE_STYLE: &str =
    "Children's storybook illustration, colorful, friendly style: ";

/// Replace `{{key}}` placeholders in a template string.
///
/// The template is scanned once, so substituted values are never rescanned.
/// Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after_open[..close];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[open..open + close + 4]),
        }
        rest = &after_open[close + 2..];
    }

    result.push_str(rest);
    result
}

/// Instruction text asking a language model for a paged story in JSON.
///
/// The page count comes from the length tag alone. The language clause is
/// left out entirely for English.
pub fn build_story_prompt(params: &StoryParameters) -> String {
    let page_count = params.story_length.page_count().to_string();
    let language_clause = if params.language.eq_ignore_ascii_case("english") {
        String::new()
    } else {
        format!("Write the story in {}.", params.language)
    };

    render(
        STORY,
        &[
            ("story_type", params.story_type.as_str()),
            ("age_group", params.age_group.as_str()),
            ("prompt", &params.prompt),
            ("tone", &params.tone_style),
            ("language_clause", &language_clause),
            ("page_count", &page_count),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, StoryLength, StoryType};

    fn params(length: &str, language: &str) -> StoryParameters {
        StoryParameters {
            prompt: "a brave knight and a sleepy dragon".to_string(),
            age_group: AgeGroup::EarlyReader,
            story_type: StoryType::Fantasy,
            story_length: StoryLength::from(length),
            language: language.to_string(),
            tone_style: "engaging".to_string(),
        }
    }

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_render_leaves_unknown_and_unclosed_placeholders() {
        assert_eq!(render("{{a}} {{other}}", &[("a", "x")]), "x {{other}}");
        assert_eq!(render("{{a}} {{open", &[("a", "x")]), "x {{open");
    }

    #[test]
    fn test_render_does_not_expand_inside_values() {
        assert_eq!(
            render("{{a}} / {{b}}", &[("a", "say {{b}}"), ("b", "hi")]),
            "say {{b}} / hi"
        );
    }

    #[test]
    fn test_user_text_with_braces_is_sent_verbatim() {
        let mut story = params("medium", "english");
        story.prompt = "a cat who says {{tone}} and counts {{page_count}} fish".to_string();
        story.tone_style = "gentle".to_string();

        let prompt = build_story_prompt(&story);
        assert!(prompt.contains("\"a cat who says {{tone}} and counts {{page_count}} fish\""));
        assert!(prompt.contains("The tone should be gentle."));
        assert!(prompt.contains("exactly 8 pages"));
    }

    #[test]
    fn test_story_template_has_placeholders() {
        for key in ["story_type", "age_group", "prompt", "tone", "language_clause", "page_count"] {
            assert!(STORY.contains(&format!("{{{{{}}}}}", key)), "missing {}", key);
        }
        assert!(IMAGE_DESCRIPTION.contains("{{prompt}}"));
        assert!(!IMAGE_FOLLOW_UP.trim().is_empty());
    }

    #[test]
    fn test_page_count_follows_length() {
        for (length, pages) in [("short", 5), ("medium", 8), ("long", 12), ("novella", 5)] {
            let prompt = build_story_prompt(&params(length, "english"));
            assert!(
                prompt.contains(&format!("exactly {} pages", pages)),
                "{} should request {} pages",
                length,
                pages
            );
        }
    }

    #[test]
    fn test_english_has_no_language_clause() {
        let prompt = build_story_prompt(&params("short", "english"));
        assert!(!prompt.contains("Write the story in"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_other_language_adds_clause() {
        let prompt = build_story_prompt(&params("short", "spanish"));
        assert!(prompt.contains("Write the story in spanish."));
    }

    #[test]
    fn test_prompt_embeds_parameters_and_output_contract() {
        let prompt = build_story_prompt(&params("medium", "english"));
        assert!(prompt.contains("fantasy story for 6-9 age group"));
        assert!(prompt.contains("\"a brave knight and a sleepy dragon\""));
        assert!(prompt.contains("The tone should be engaging."));
        assert!(prompt.contains("\"pageNumber\": 1"));
        assert!(prompt.contains("\"imagePrompt\""));
        assert!(prompt.contains("title page"));
        assert!(prompt.contains("The End"));
    }
}
