//! Browser navigation for chat sessions.

use std::rc::Rc;

use leptos::logging;
use leptos_router::NavigateOptions;

use crate::Navigator;

/// [`Navigator`] over the Leptos router and the browser History API.
///
/// Root redirects go through the router and replace the dead chat entry. Slug and id updates
/// rewrite the address bar with `history.replaceState` so the active chat view is not re-routed
/// and remounted mid-save.
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    /// Captures the router's navigate function; call inside a `<Router>`.
    pub fn from_router() -> Self {
        let navigate = leptos_router::use_navigate();
        Self {
            navigate: Rc::new(move |path, options| navigate(path, options)),
        }
    }
}

impl Navigator for RouterNavigator {
    fn navigate_replace(&self, path: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let replaced = web_sys::window()
                .and_then(|window| window.history().ok())
                .map(|history| {
                    history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
                });
            if let Some(Ok(())) = replaced {
                return;
            }
        }

        logging::debug_warn!("history.replaceState unavailable; routing to {path}");
        (self.navigate)(path, replacing());
    }

    fn navigate_root(&self) {
        (self.navigate)("/", replacing());
    }
}

fn replacing() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..NavigateOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recording() -> (RouterNavigator, Rc<RefCell<Vec<(String, bool)>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let navigator = RouterNavigator {
            navigate: Rc::new(move |path: &str, options: NavigateOptions| {
                sink.borrow_mut().push((path.to_string(), options.replace));
            }),
        };
        (navigator, calls)
    }

    #[test]
    fn root_redirect_replaces_the_dead_chat_entry() {
        let (navigator, calls) = recording();
        navigator.navigate_root();
        assert_eq!(*calls.borrow(), vec![("/".to_string(), true)]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn chat_path_update_falls_back_to_replacing_route() {
        let (navigator, calls) = recording();
        navigator.navigate_replace("/chat/todo-app");
        assert_eq!(*calls.borrow(), vec![("/chat/todo-app".to_string(), true)]);
    }
}
