use axum::{
    body::Body,
    extract::{Form, Path as AxumPath, State},
    http::{header, HeaderValue, Response},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::components::TemplateComponent;
use crate::errors::WikiError;
use crate::services::metadata_codec::parse_metadata_json;
use crate::services::{sanitize_page_name, PageName};
use crate::types::{AppState, Page};
use crate::utils::{content_type_for, encode_page_url, ensure_safe_path, last_modified_html};

const MAIN_PAGE: &str = "Main";

fn view_redirect(name: &str) -> Response<Body> {
    Redirect::to(&format!("/view/{}", encode_page_url(name))).into_response()
}

fn templates(state: &AppState) -> TemplateComponent {
    TemplateComponent::new(&state.config.template_dir, state.config.version)
}

/// `/` always lands on the main page
pub async fn handle_root() -> impl IntoResponse {
    view_redirect(MAIN_PAGE)
}

/// Render a page, or send the user to the editor if it does not exist yet
pub async fn handle_view(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("View request for '{}'", name);

    let page = match state.wiki.load(&name) {
        Ok(page) => page,
        Err(WikiError::InvalidName(_)) | Err(WikiError::InvalidPath) => {
            log::warn!("Invalid page name '{}', redirecting to {}", name, MAIN_PAGE);
            return Ok(view_redirect(MAIN_PAGE));
        }
        Err(WikiError::NotFound) => {
            let target = sanitize_page_name(&name);
            log::debug!("Page '{}' does not exist yet, opening editor", target);
            return Ok(Redirect::to(&format!("/edit/{}", encode_page_url(&target))).into_response());
        }
        Err(e) => return Err(e),
    };

    let html = state.wiki.render(&page.content);
    let last_modified = state
        .wiki
        .store()
        .path_of(&page.name)
        .map(|p| last_modified_html(&p))
        .unwrap_or_default();

    let templates = templates(&state);
    let body = templates.view_body(&page, &html, &last_modified);
    let out = templates.render_layout(page.name.as_str(), page.name.as_str(), &body)?;
    Ok(Html(out).into_response())
}

/// Edit form, pre-filled when the page exists
pub async fn handle_edit(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Edit request for '{}'", name);

    let page_name = match PageName::parse(&name) {
        Ok(page_name) => page_name,
        Err(_) => return Ok(view_redirect(MAIN_PAGE)),
    };
    let store = state.wiki.store();
    let page = if store.exists(&page_name) {
        match store.load(&page_name) {
            Ok(page) => page,
            // Deleted between the check and the read
            Err(WikiError::NotFound) => Page::empty(page_name),
            Err(e) => return Err(e),
        }
    } else if store.path_of(&page_name).is_err() {
        return Ok(view_redirect(MAIN_PAGE));
    } else {
        log::debug!("Page '{}' does not exist yet, showing an empty form", page_name);
        Page::empty(page_name)
    };

    let templates = templates(&state);
    let body = templates.edit_body(&page);
    let title = format!("Editing {}", page.name);
    let out = templates.render_layout(&title, page.name.as_str(), &body)?;
    Ok(Html(out).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub page_name: String,
    #[serde(default)]
    pub page_content: String,
    #[serde(default)]
    pub page_metadata: String,
}

pub async fn handle_save(
    State(state): State<AppState>,
    Form(form): Form<SaveForm>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Save request for '{}'", form.page_name);

    let metadata = parse_metadata_json(&form.page_metadata);
    match state.wiki.save(&form.page_name, &form.page_content, metadata) {
        Ok(name) => Ok(view_redirect(name.as_str())),
        Err(WikiError::InvalidName(_)) | Err(WikiError::InvalidPath) => {
            log::warn!("Refusing to save invalid page name '{}'", form.page_name);
            Ok(view_redirect(MAIN_PAGE))
        }
        Err(e) => Err(e),
    }
}

/// Delete a page; deleting something already gone is not an error here
pub async fn handle_delete(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Delete request for '{}'", name);

    match state.wiki.delete(&name) {
        Ok(()) | Err(WikiError::NotFound) => Ok(view_redirect(MAIN_PAGE)),
        Err(WikiError::InvalidName(_)) | Err(WikiError::InvalidPath) => Ok(view_redirect(MAIN_PAGE)),
        Err(e) => Err(e),
    }
}

pub async fn handle_all_pages(State(state): State<AppState>) -> Result<Response<Body>, WikiError> {
    let pages = state.wiki.list_all_pages();
    let templates = templates(&state);
    let body = templates.all_pages_body(&pages);
    let out = templates.render_layout("All pages", "", &body)?;
    Ok(Html(out).into_response())
}

/// Serve files from the static directory
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    let relative = path.trim_start_matches('/');
    ensure_safe_path(relative)?;
    let requested = state.config.static_dir.join(relative);
    if !requested.is_file() {
        return Err(WikiError::NotFound);
    }

    let bytes = std::fs::read(&requested)?;
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type_for(&requested)));
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn state(temp_dir: &TempDir) -> AppState {
        let config = Config::with_custom(
            temp_dir.path().join("data"),
            temp_dir.path().join("static"),
            None,
            None,
        );
        AppState::new(config)
    }

    fn location(resp: &Response<Body>) -> &str {
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    async fn body_text(resp: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_main() {
        let resp = handle_root().await.into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/view/Main");
    }

    #[tokio::test]
    async fn test_view_missing_page_opens_editor() {
        let temp_dir = TempDir::new().unwrap();
        let resp = handle_view(State(state(&temp_dir)), AxumPath("New Page".to_string())).await.unwrap();
        assert_eq!(location(&resp), "/edit/New-Page");
    }

    #[tokio::test]
    async fn test_view_invalid_name_redirects_to_main() {
        let temp_dir = TempDir::new().unwrap();
        let resp = handle_view(State(state(&temp_dir)), AxumPath("///".to_string())).await.unwrap();
        assert_eq!(location(&resp), "/view/Main");
    }

    #[tokio::test]
    async fn test_save_then_view_renders_markup() {
        let temp_dir = TempDir::new().unwrap();
        let state = state(&temp_dir);
        let form = SaveForm {
            page_name: "Notes:First Day".to_string(),
            page_content: "# Hello\n**World** [[Main]]".to_string(),
            page_metadata: r#"{"tags":"intro"}"#.to_string(),
        };
        let resp = handle_save(State(state.clone()), Form(form)).await.unwrap();
        assert_eq!(location(&resp), "/view/Notes:First-Day");

        let resp = handle_view(State(state), AxumPath("Notes:First-Day".to_string())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("<h1> Hello</h1><br><b>World</b> <a href=\"/view/Main\">Main</a>"));
        assert!(html.contains("<dt>tags</dt><dd>intro</dd>"));
        assert!(html.contains("Last modified: "));
    }

    #[tokio::test]
    async fn test_edit_missing_page_is_empty_form() {
        let temp_dir = TempDir::new().unwrap();
        let resp = handle_edit(State(state(&temp_dir)), AxumPath("Fresh".to_string())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("name=\"page_name\" value=\"Fresh\""));
    }

    #[tokio::test]
    async fn test_edit_existing_page_is_prefilled() {
        let temp_dir = TempDir::new().unwrap();
        let state = state(&temp_dir);
        state.wiki.save("Main", "hello there", Default::default()).unwrap();
        let resp = handle_edit(State(state), AxumPath("Main".to_string())).await.unwrap();
        assert!(body_text(resp).await.contains(">\nhello there</textarea>"));
    }

    #[tokio::test]
    async fn test_edit_empty_segment_redirects_to_main() {
        let temp_dir = TempDir::new().unwrap();
        let resp = handle_edit(State(state(&temp_dir)), AxumPath("Foo::Bar".to_string())).await.unwrap();
        assert_eq!(location(&resp), "/view/Main");
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let temp_dir = TempDir::new().unwrap();
        let state = state(&temp_dir);
        state.wiki.save("Keep", "a", Default::default()).unwrap();
        state.wiki.save("Drop:Me", "b", Default::default()).unwrap();

        let resp = handle_delete(State(state.clone()), AxumPath("Drop:Me".to_string())).await.unwrap();
        assert_eq!(location(&resp), "/view/Main");
        let resp = handle_delete(State(state.clone()), AxumPath("Drop:Me".to_string())).await.unwrap();
        assert_eq!(location(&resp), "/view/Main");

        let html = body_text(handle_all_pages(State(state)).await.unwrap()).await;
        assert!(html.contains("<a href=\"/view/Keep\">Keep</a>"));
        assert!(!html.contains("Drop:Me"));
    }

    #[tokio::test]
    async fn test_static_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let err = handle_static(State(state(&temp_dir)), AxumPath("../data/Main.txt".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, WikiError::InvalidPath));
    }

    #[tokio::test]
    async fn test_static_serves_css() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("static/css")).unwrap();
        std::fs::write(temp_dir.path().join("static/css/dftr.css"), "body{}").unwrap();
        let resp = handle_static(State(state(&temp_dir)), AxumPath("css/dftr.css".to_string())).await.unwrap();
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/css; charset=utf-8");
        assert_eq!(body_text(resp).await, "body{}");
    }
}
