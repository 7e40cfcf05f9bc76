//! Story model

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Author label shown when a record carries no author.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Title shown when a record carries no title.
pub const UNTITLED_STORY: &str = "Untitled story";

/// Identifier of a story: Unix milliseconds at creation time.
///
/// It is the only key used to de-duplicate records, and sorting by it gives
/// reverse-chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StoryId(i64);

impl StoryId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl<'de> Deserialize<'de> for StoryId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Spreadsheet-backed remotes hand ids back as floats or strings.
        match Value::deserialize(deserializer)? {
            Value::Number(number) => number_to_i64(&number)
                .map(Self)
                .ok_or_else(|| de::Error::custom(format!("id {number} is not an integer"))),
            Value::String(text) => text
                .parse()
                .map_err(|error| de::Error::custom(format!("id {text:?}: {error}"))),
            other => Err(de::Error::custom(format!(
                "id must be a number or numeric string, got {other}"
            ))),
        }
    }
}

/// A fan story on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier, creation time in Unix ms
    pub id: StoryId,
    /// Author name, absent on legacy records
    #[serde(default, deserialize_with = "optional_text")]
    pub author: Option<String>,
    /// Story title, absent on legacy records
    #[serde(default, deserialize_with = "optional_text")]
    pub title: Option<String>,
    /// Story body
    #[serde(default, deserialize_with = "plain_text")]
    pub content: String,
    /// Display date produced by the submitting device; never parsed
    #[serde(default, deserialize_with = "plain_text")]
    pub date: String,
    /// Like counter
    #[serde(default, deserialize_with = "like_count")]
    pub likes: u64,
    /// Whether this device liked the story
    #[serde(rename = "likedByUser", default, deserialize_with = "flag")]
    pub liked_by_user: bool,
}

impl Story {
    /// Author for display, falling back to [`ANONYMOUS_AUTHOR`]
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(ANONYMOUS_AUTHOR)
    }

    /// Title for display, falling back to [`UNTITLED_STORY`]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED_STORY)
    }

    /// Flip the like flag for this device, keeping the counter at or above zero.
    pub fn toggle_like(&mut self) {
        if self.liked_by_user {
            self.likes = self.likes.saturating_sub(1);
            self.liked_by_user = false;
        } else {
            self.likes = self.likes.saturating_add(1);
            self.liked_by_user = true;
        }
    }
}

/// Validated input for a new story.
///
/// All three fields are trimmed; none may be empty and the content must be at
/// least [`StoryDraft::MIN_CONTENT_CHARS`] characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDraft {
    author: String,
    title: String,
    content: String,
}

impl StoryDraft {
    pub const MIN_CONTENT_CHARS: usize = 10;

    pub fn new(author: &str, title: &str, content: &str) -> Result<Self> {
        let author = required_field(author, "author")?;
        let title = required_field(title, "title")?;
        let content = required_field(content, "content")?;

        let length = content.chars().count();
        if length < Self::MIN_CONTENT_CHARS {
            return Err(Error::Validation(format!(
                "content must be at least {} characters (got {length})",
                Self::MIN_CONTENT_CHARS
            )));
        }

        Ok(Self {
            author,
            title,
            content,
        })
    }

    /// Turn the draft into a fresh, unliked story.
    #[must_use]
    pub fn into_story(self, id: StoryId, date: String) -> Story {
        Story {
            id,
            author: Some(self.author),
            title: Some(self.title),
            content: self.content,
            date,
            likes: 0,
            liked_by_user: false,
        }
    }
}

fn required_field(value: &str, name: &str) -> Result<String> {
    normalize_text_option(Some(value.to_string()))
        .ok_or_else(|| Error::Validation(format!("{name} must not be empty")))
}

// Floats outside this range would saturate on the cast.
const I64_LOWER_BOUND: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn number_to_i64(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|value| {
                value.fract() == 0.0 && (I64_LOWER_BOUND..I64_UPPER_BOUND).contains(value)
            })
            .map(|value| value as i64)
    })
}

fn scalar_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(normalize_text_option(value.and_then(scalar_to_text)))
}

fn plain_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_text).unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn like_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number_to_i64(&number)
            .or_else(|| number.as_f64().map(|value| value.floor() as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u64::try_from(count).unwrap_or(0))
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_i64().is_some_and(|value| value != 0),
        Some(Value::String(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        _ => false,
    })
}

#[cfg(test)]
pub(crate) fn story(id: i64, likes: u64) -> Story {
    Story {
        id: StoryId::new(id),
        author: Some(format!("author-{id}")),
        title: Some(format!("title-{id}")),
        content: "a story long enough to pass".to_string(),
        date: String::new(),
        likes,
        liked_by_user: false,
    }
}
