use std::fmt;

use cbt_core::model::ExamId;
use cbt_core::{ExamCatalog, NavigationError};
use url::Url;
use url::form_urlencoded;

use crate::vm::Notice;

const BASE: &str = "http://localhost/";

/// The four pages of the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Exams { filter: Option<String> },
    TestInterface { exam: Option<String> },
    Dashboard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteError {
    InvalidUrl(url::ParseError),
    UnknownPage(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidUrl(err) => write!(f, "invalid address: {err}"),
            RouteError::UnknownPage(page) => write!(f, "unknown page: {page}"),
        }
    }
}

impl std::error::Error for RouteError {}

impl Route {
    #[must_use]
    pub fn exams() -> Self {
        Route::Exams { filter: None }
    }

    #[must_use]
    pub fn exams_filtered(filter: impl Into<String>) -> Self {
        Route::Exams {
            filter: Some(filter.into()),
        }
    }

    #[must_use]
    pub fn test(exam_id: &ExamId) -> Self {
        Route::TestInterface {
            exam: Some(exam_id.as_str().to_string()),
        }
    }

    /// Parse a site-relative path (`exams.html?filter=jamb`) or absolute URL.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::InvalidUrl` for malformed input and
    /// `RouteError::UnknownPage` for pages outside the site.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let base = Url::parse(BASE).map_err(RouteError::InvalidUrl)?;
        let url = base.join(input.trim()).map_err(RouteError::InvalidUrl)?;
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        match url.path().trim_start_matches('/') {
            "" | "index.html" => Ok(Route::Home),
            "exams.html" => Ok(Route::Exams {
                filter: param("filter"),
            }),
            "test-interface.html" => Ok(Route::TestInterface {
                exam: param("exam"),
            }),
            "dashboard.html" => Ok(Route::Dashboard),
            other => Err(RouteError::UnknownPage(other.to_string())),
        }
    }

    #[must_use]
    pub fn to_path(&self) -> String {
        let with_query = |page: &str, key: &str, value: Option<&String>| match value {
            Some(value) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(key, value)
                    .finish();
                format!("{page}?{query}")
            }
            None => page.to_string(),
        };
        match self {
            Route::Home => "/".to_string(),
            Route::Exams { filter } => with_query("exams.html", "filter", filter.as_ref()),
            Route::TestInterface { exam } => {
                with_query("test-interface.html", "exam", exam.as_ref())
            }
            Route::Dashboard => "dashboard.html".to_string(),
        }
    }
}

/// Where to send the user instead, and what to tell them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub notice: Notice,
}

/// Resolve the `exam` parameter of the test page against the catalog.
///
/// # Errors
///
/// Returns a `Redirect` back to the catalog with an error toast when the
/// parameter is missing or names no known exam.
pub fn resolve_test_route(exam: Option<&str>, catalog: &ExamCatalog) -> Result<ExamId, Redirect> {
    let exam = exam.map(str::trim).unwrap_or_default();
    let resolved = if exam.is_empty() {
        Err(NavigationError::MissingExam)
    } else {
        catalog
            .find(exam)
            .map(|descriptor| descriptor.id.clone())
            .ok_or_else(|| NavigationError::UnknownExam(exam.to_string()))
    };
    resolved.map_err(|err| Redirect {
        to: Route::exams(),
        notice: Notice::error(err.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::ToastKind;

    #[test]
    fn parses_site_pages() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("index.html").unwrap(), Route::Home);
        assert_eq!(
            Route::parse("exams.html?filter=jamb").unwrap(),
            Route::exams_filtered("jamb")
        );
        assert_eq!(
            Route::parse("http://localhost/test-interface.html?exam=jamb-math-2024").unwrap(),
            Route::TestInterface {
                exam: Some("jamb-math-2024".into())
            }
        );
        assert_eq!(Route::parse("/dashboard.html").unwrap(), Route::Dashboard);
        assert!(matches!(
            Route::parse("admin.html"),
            Err(RouteError::UnknownPage(page)) if page == "admin.html"
        ));
    }

    #[test]
    fn paths_round_trip_through_parse() {
        for route in [
            Route::Home,
            Route::exams(),
            Route::exams_filtered("weak-areas"),
            Route::test(&ExamId::new("neco-math-2024")),
            Route::Dashboard,
        ] {
            assert_eq!(Route::parse(&route.to_path()).unwrap(), route);
        }
        assert_eq!(
            Route::exams_filtered("weak-areas").to_path(),
            "exams.html?filter=weak-areas"
        );
    }

    #[test]
    fn test_route_requires_known_exam() {
        let catalog = ExamCatalog::builtin();
        assert_eq!(
            resolve_test_route(Some("jamb-physics-2024"), &catalog).unwrap(),
            ExamId::new("jamb-physics-2024")
        );

        let missing = resolve_test_route(None, &catalog).unwrap_err();
        assert_eq!(missing.to, Route::exams());
        assert_eq!(missing.notice.message, "No exam specified");
        assert_eq!(missing.notice.kind, ToastKind::Error);

        let unknown = resolve_test_route(Some("latin-101"), &catalog).unwrap_err();
        assert_eq!(unknown.notice.message, "Exam not found: latin-101");
    }
}
