use chrono::NaiveDate;

/// Entry points the app can be opened at from an external URL. Mirrors the
/// route prefixes `main`, `exercise-select`, `log-set` and
/// `reset-password`; the two workout routes carry the target date in a
/// `date=YYYY-MM-DD` query parameter and default to today without one.
#[derive(Clone, Debug, PartialEq)]
pub enum DeepLink {
    Main,
    ExerciseSelect { date: Option<NaiveDate> },
    LogSet { date: Option<NaiveDate> },
    ResetPassword,
}

pub fn parse_link(path: &str, query: &str) -> Option<DeepLink> {
    let last = path.trim_matches('/').rsplit('/').next().unwrap_or("");
    match last {
        "main" => Some(DeepLink::Main),
        "exercise-select" => Some(DeepLink::ExerciseSelect {
            date: date_param(query),
        }),
        "log-set" => Some(DeepLink::LogSet {
            date: date_param(query),
        }),
        "reset-password" => Some(DeepLink::ResetPassword),
        _ => None,
    }
}

/// Pulls the recovery access token out of the URL fragment the auth
/// service redirects to (`#access_token=...&type=recovery`). Only recovery
/// links count; other token-bearing fragments are ignored.
pub fn recovery_token(fragment: &str) -> Option<String> {
    let fragment = fragment.trim_start_matches('#');
    let mut token = None;
    let mut is_recovery = false;
    for pair in fragment.split('&') {
        match pair.split_once('=') {
            Some(("access_token", value)) if !value.is_empty() => {
                token = Some(value.to_string());
            }
            Some(("type", "recovery")) => is_recovery = true,
            _ => {}
        }
    }
    if is_recovery {
        token
    } else {
        None
    }
}

fn date_param(query: &str) -> Option<NaiveDate> {
    let query = query.trim_start_matches('?');
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "date" {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefixes_map_to_routes() {
        assert_eq!(parse_link("/main", ""), Some(DeepLink::Main));
        assert_eq!(
            parse_link("/app/reset-password", ""),
            Some(DeepLink::ResetPassword)
        );
        assert_eq!(
            parse_link("/exercise-select", "?date=2026-08-04"),
            Some(DeepLink::ExerciseSelect {
                date: NaiveDate::from_ymd_opt(2026, 8, 4)
            })
        );
        assert_eq!(
            parse_link("/log-set", ""),
            Some(DeepLink::LogSet { date: None })
        );
    }

    #[test]
    fn unknown_paths_are_ignored() {
        assert_eq!(parse_link("/", ""), None);
        assert_eq!(parse_link("/admin", ""), None);
        assert_eq!(parse_link("", "?date=2026-08-04"), None);
    }

    #[test]
    fn bad_date_params_fall_back_to_none() {
        assert_eq!(
            parse_link("/log-set", "?date=not-a-date"),
            Some(DeepLink::LogSet { date: None })
        );
    }

    #[test]
    fn recovery_token_requires_recovery_type() {
        assert_eq!(
            recovery_token("#access_token=abc123&type=recovery"),
            Some("abc123".to_string())
        );
        assert_eq!(recovery_token("#access_token=abc123&type=magiclink"), None);
        assert_eq!(recovery_token("#type=recovery"), None);
        assert_eq!(recovery_token(""), None);
    }
}
