//! Query string tokenization.
//!
//! Six independent regex matchers scan the raw query; each collects its own
//! typed fragments, then every matched substring is stripped and whatever
//! remains is the plain-text remainder. The patterns are not a disambiguating
//! grammar, deliberately: they overlap, and each claims whatever part of the
//! string it happens to match.

use once_cell::sync::Lazy;
use regex::Regex;

static TAGS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-)?\[(.*?)\]").expect("tags pattern"));

static STRICT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(title|body)?:?"(.*?)""#).expect("strict pattern"));

static SCORE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"score:(?P<min_score>-?\d+)?(?P<operator>-|\.\.)?(?P<max_score>-?\d+)?")
        .expect("score pattern")
});

static USER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"user:(\d+)").expect("user pattern"));

static DATES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<field>created|lastactive):(?P<start_date>\d{4}(?:-\d{2}(?:-\d{2})?)?)(?P<operator>\.\.)?(?P<end_date>\d{4}(?:-\d{2}(?:-\d{2})?)?)?",
    )
    .expect("dates pattern")
});

static BOOLEANS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(hasaccepted|isanswered):(true|false|yes|no|1|0)").expect("booleans pattern")
});

/// A `[tagname]` fragment, optionally negated with a leading `-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    pub negated: bool,
    pub name: String,
}

/// Which columns a quoted phrase is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictField {
    Title,
    Body,
    /// No prefix: title, body and answer bodies together
    Any,
}

/// A quoted-phrase fragment, e.g. `title:"exact words"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictToken {
    pub field: StrictField,
    pub phrase: String,
}

/// A `score:` fragment. A bare minimum means an open-ended `>=` threshold;
/// the operator (`-` or `..`) marks an explicit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreToken {
    pub min: Option<i64>,
    pub ranged: bool,
    pub max: Option<i64>,
}

/// Which timestamp a date fragment filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Created,
    LastActive,
}

/// A `created:`/`lastactive:` fragment. Dates stay raw here; they are parsed
/// by the condition builder, where a bad format becomes a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    pub field: DateField,
    pub start: String,
    pub ranged: bool,
    pub end: Option<String>,
}

/// Which boolean filter a `hasaccepted:`/`isanswered:` fragment selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolField {
    HasAccepted,
    IsAnswered,
}

/// A boolean fragment with its truthiness already decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolToken {
    pub field: BoolField,
    pub value: bool,
}

/// Everything one tokenizer pass extracts from a raw query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedQuery {
    pub tags: Vec<TagToken>,
    pub strict: Vec<StrictToken>,
    pub scores: Vec<ScoreToken>,
    pub users: Vec<u64>,
    pub dates: Vec<DateToken>,
    pub booleans: Vec<BoolToken>,
    pub plain_text: String,
}

/// Splits a raw query string into typed fragments plus plain text
pub struct QueryTokenizer;

impl QueryTokenizer {
    pub fn tokenize(query: &str) -> TokenizedQuery {
        let tags = TAGS_PATTERN
            .captures_iter(query)
            .map(|caps| TagToken {
                negated: caps.get(1).is_some(),
                name: caps[2].to_string(),
            })
            .collect();

        let strict = STRICT_PATTERN
            .captures_iter(query)
            .map(|caps| StrictToken {
                field: match caps.get(1).map(|field| field.as_str()) {
                    Some("title") => StrictField::Title,
                    Some("body") => StrictField::Body,
                    _ => StrictField::Any,
                },
                phrase: caps[2].to_string(),
            })
            .collect();

        let scores = SCORE_PATTERN
            .captures_iter(query)
            .filter_map(|caps| {
                let min = caps
                    .name("min_score")
                    .and_then(|m| m.as_str().parse::<i64>().ok());
                let max = caps
                    .name("max_score")
                    .and_then(|m| m.as_str().parse::<i64>().ok());
                // A match with no usable bound is treated as absent
                if min.is_none() && max.is_none() {
                    return None;
                }
                Some(ScoreToken {
                    min,
                    ranged: caps.name("operator").is_some(),
                    max,
                })
            })
            .collect();

        let users = USER_PATTERN
            .captures_iter(query)
            .filter_map(|caps| caps[1].parse::<u64>().ok())
            .collect();

        let dates = DATES_PATTERN
            .captures_iter(query)
            .map(|caps| DateToken {
                field: if &caps["field"] == "created" {
                    DateField::Created
                } else {
                    DateField::LastActive
                },
                start: caps["start_date"].to_string(),
                ranged: caps.name("operator").is_some(),
                end: caps.name("end_date").map(|end| end.as_str().to_string()),
            })
            .collect();

        let booleans = BOOLEANS_PATTERN
            .captures_iter(query)
            .map(|caps| BoolToken {
                field: if &caps[1] == "hasaccepted" {
                    BoolField::HasAccepted
                } else {
                    BoolField::IsAnswered
                },
                value: matches!(&caps[2], "true" | "yes" | "1"),
            })
            .collect();

        // Strip every matched substring, pattern by pattern, then trim
        let mut remainder = query.to_string();
        for pattern in [
            &*TAGS_PATTERN,
            &*STRICT_PATTERN,
            &*SCORE_PATTERN,
            &*USER_PATTERN,
            &*DATES_PATTERN,
            &*BOOLEANS_PATTERN,
        ] {
            remainder = pattern.replace_all(&remainder, "").into_owned();
        }
        let plain_text = remainder.trim().to_string();

        TokenizedQuery {
            tags,
            strict,
            scores,
            users,
            dates,
            booleans,
            plain_text,
        }
    }
}
