use std::rc::Rc;

use chat_history::{
    use_chat_history, ArtifactSummary, ChatDatabase, ChatMessage, RouterNavigator,
};
use chat_history_host::GuardedOpener;
use chat_history_web::{chat_store_opener, load_chat_history_config, IndexedDbOpener};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use serde_json::json;

type AppDatabase = ChatDatabase<GuardedOpener<IndexedDbOpener>>;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    let config = load_chat_history_config();
    let database: Rc<AppDatabase> =
        Rc::new(ChatDatabase::new(&config, chat_store_opener(&config)));
    provide_context(database);

    view! {
        <Title text="Chat" />
        <Meta name="description" content="Chat with locally persisted conversation history." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=ChatEntry />
                    <Route path="/chat/:id" view=ChatEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn ChatEntry() -> impl IntoView {
    let database = use_context::<Rc<AppDatabase>>().expect("AppDatabase not provided");
    let params = use_params_map();
    let route_id = params.with_untracked(|map| map.get("id").cloned());

    let artifact = create_rw_signal(None::<ArtifactSummary>);
    let history = use_chat_history(database, route_id, RouterNavigator::from_router(), artifact);

    let messages = create_rw_signal(Vec::<ChatMessage>::new());
    let draft = create_rw_signal(String::new());
    let project = create_rw_signal(String::new());
    let ready = history.ready;
    let description = history.description;
    hydrate_once(ready, history.initial_messages, messages);

    let send = move |_| {
        let text = draft.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        if artifact.get_untracked().is_none() {
            artifact.set(artifact_from_project_name(&project.get_untracked()));
        }
        messages.update(|all| all.push(json!({ "role": "user", "content": text })));
        draft.set(String::new());
        history.store_message_history(messages.get_untracked());
    };

    view! {
        <section class="chat-view">
            {move || {
                (!ready.get()).then(|| view! { <p class="chat-loading">"Loading chat..."</p> })
            }}
            <h1>{move || description.get().unwrap_or_else(|| "New chat".to_string())}</h1>
            <ul class="chat-messages">
                <For
                    each=move || messages.get().into_iter().enumerate()
                    key=|(index, _)| *index
                    children=|(_, message)| view! { <li>{message_text(&message)}</li> }
                />
            </ul>
            <input
                class="chat-project"
                placeholder="Project name"
                prop:value=move || project.get()
                on:input=move |ev| project.set(event_target_value(&ev))
            />
            <textarea
                class="chat-draft"
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
            ></textarea>
            <button class="chat-send" on:click=send>"Send"</button>
        </section>
    }
}

/// Copies the restored messages into the view on the first `false -> true` edge of `ready`.
fn hydrate_once(
    ready: RwSignal<bool>,
    initial_messages: RwSignal<Vec<ChatMessage>>,
    messages: RwSignal<Vec<ChatMessage>>,
) {
    create_effect(move |hydrated: Option<bool>| {
        let hydrated = hydrated.unwrap_or(false);
        if hydrated || !ready.get() {
            return hydrated;
        }
        messages.set(initial_messages.get_untracked());
        true
    });
}

fn message_text(message: &ChatMessage) -> String {
    message
        .get("content")
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| message.to_string())
}

fn artifact_from_project_name(name: &str) -> Option<ArtifactSummary> {
    let title = name.trim();
    let id = slugify(title);
    if id.is_empty() {
        return None;
    }
    Some(ArtifactSummary {
        id,
        title: title.to_string(),
    })
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Todo App"), "todo-app");
        assert_eq!(slugify("  My   App!! v2 "), "my-app-v2");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn project_name_becomes_artifact() {
        assert_eq!(
            artifact_from_project_name(" Todo App "),
            Some(ArtifactSummary {
                id: "todo-app".to_string(),
                title: "Todo App".to_string(),
            })
        );
        assert_eq!(artifact_from_project_name("  "), None);
    }

    #[test]
    fn repeated_ready_writes_keep_appended_messages() {
        let runtime = create_runtime();
        let ready = create_rw_signal(false);
        let initial = create_rw_signal(vec![json!("m0")]);
        let messages = create_rw_signal(Vec::<ChatMessage>::new());
        hydrate_once(ready, initial, messages);

        ready.set(true);
        assert_eq!(messages.get_untracked(), vec![json!("m0")]);
        messages.update(|all| all.push(json!("m1")));
        ready.set(true);
        assert_eq!(messages.get_untracked(), vec![json!("m0"), json!("m1")]);

        runtime.dispose();
    }

    #[test]
    fn message_text_prefers_content_field() {
        assert_eq!(message_text(&json!({"role": "user", "content": "hi"})), "hi");
        assert_eq!(message_text(&json!(42)), "42");
    }
}
