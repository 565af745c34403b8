//! Turning command results into terminal output.
//!
//! Every command produces a view: a plain struct that serializes for
//! `--json` and renders as text otherwise.

use serde::Serialize;

use crate::error::CliResult;

pub trait Render {
    fn render(&self) -> String;
}

/// A command's output in both forms.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub text: String,
    pub json: serde_json::Value,
}

impl Rendered {
    pub fn view<T: Serialize + Render>(view: &T) -> CliResult<Self> {
        Ok(Rendered {
            text: view.render(),
            json: serde_json::to_value(view)?,
        })
    }

    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        Rendered {
            json: serde_json::json!({ "message": text }),
            text,
        }
    }

    pub fn output(&self, json: bool) -> String {
        if json {
            self.json.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// `4.2` or `-` when unrated.
pub fn stars(rating: Option<f32>) -> String {
    rating
        .map(|r| format!("★ {:.1}", r))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        name: String,
    }

    impl Render for Greeting {
        fn render(&self) -> String {
            format!("Hello, {}", self.name)
        }
    }

    #[test]
    fn test_view_has_text_and_json() {
        let rendered = Rendered::view(&Greeting { name: "Ana".into() }).unwrap();
        assert_eq!(rendered.output(false), "Hello, Ana");
        assert_eq!(rendered.output(true), r#"{"name":"Ana"}"#);
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(Some(4.25)), "★ 4.2");
        assert_eq!(stars(None), "-");
    }
}
