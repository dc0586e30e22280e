use serde::{Deserialize, Serialize};

const MAX_YEARS_EXPERIENCE: i32 = 60;
const MAX_BIO_CHARS: usize = 2000;

/// Admin form payload for creating or replacing an expert profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertInput {
    pub name: String,
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub years_experience: i32,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validates and cleans an expert payload.
///
/// Returns the cleaned input (trimmed strings, blank optionals dropped, expertise tags
/// lowercased and deduplicated in first-seen order) or every field error found.
pub fn validate_expert(input: ExpertInput) -> Result<ExpertInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required".to_string(),
        });
    }

    let title = input.title.trim().to_string();
    if title.is_empty() {
        errors.push(FieldError {
            field: "title",
            message: "Title is required".to_string(),
        });
    }

    let email = input.email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        errors.push(FieldError {
            field: "email",
            message: format!("'{}' is not a valid email address", input.email.trim()),
        });
    }

    if !(0..=MAX_YEARS_EXPERIENCE).contains(&input.years_experience) {
        errors.push(FieldError {
            field: "years_experience",
            message: format!("Years of experience must be between 0 and {MAX_YEARS_EXPERIENCE}"),
        });
    }

    if let Some(rate) = input.hourly_rate {
        if !rate.is_finite() || rate < 0.0 {
            errors.push(FieldError {
                field: "hourly_rate",
                message: "Hourly rate must be a non-negative number".to_string(),
            });
        }
    }

    let bio = clean_optional(input.bio);
    if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
        errors.push(FieldError {
            field: "bio",
            message: format!("Bio must be at most {MAX_BIO_CHARS} characters"),
        });
    }

    let avatar_url = clean_optional(input.avatar_url);
    if let Some(url) = &avatar_url {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(FieldError {
                field: "avatar_url",
                message: "Avatar URL must be an http(s) URL".to_string(),
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ExpertInput {
        name,
        email,
        title,
        company: clean_optional(input.company),
        expertise: normalize_tags(&input.expertise),
        bio,
        years_experience: input.years_experience,
        hourly_rate: input.hourly_rate,
        avatar_url,
        is_active: input.is_active,
    })
}

/// Joins field errors into a single message for `AppError::Validation`.
pub fn describe_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
