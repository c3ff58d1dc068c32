//! End-to-end mention flows through the event adapter

use std::sync::{Arc, Mutex};

use mentions::adapter::{
    EditorEvent, Expander, MemoryEditor, MemoryFrame, MemoryFrames, MemoryHost,
    MemoryNavigators, MemorySurface, OBJECT_REPLACEMENT, Reaction,
};
use mentions::error::{MentionsError, UsageError};
use mentions::matcher::{Key, KeySet};
use mentions::negotiation::{MatchChange, ProviderResult, RemoteFrame};
use mentions::session::{
    CommitOutcome, CommitResolution, InputOutcome, KeyOutcome, Phase, Resolution, Session,
    SessionOptions,
};
use mentions::surface::{FocusTarget, KeyPress, OptionItem, Surface, SurfaceRef, Target};

struct Harness {
    editor: MemoryEditor,
    navigators: Arc<MemoryNavigators>,
    expander: Expander,
    changes: Arc<Mutex<Vec<(String, String)>>>,
}

impl Harness {
    fn new(options: SessionOptions) -> Self {
        let editor = MemoryEditor::rich();
        let navigators = Arc::new(MemoryNavigators::new());
        let session = Session::attach(
            Box::new(MemoryHost::new(editor.clone())),
            options,
            navigators.clone(),
        )
        .unwrap();
        Self {
            editor,
            navigators,
            expander: Expander::new(session),
            changes: Arc::default(),
        }
    }

    fn with_keys(keys: Vec<Key>) -> Self {
        Self::new(SessionOptions::new(KeySet::new(keys)))
    }

    /// Record every change and answer it with `surface`
    fn serve(&mut self, surface: SurfaceRef) {
        let changes = self.changes.clone();
        self.expander
            .session_mut()
            .on_match_change(move |change: &mut MatchChange| {
                changes
                    .lock()
                    .unwrap()
                    .push((change.key().to_string(), change.text().to_string()));
                change.provide(ProviderResult::matched(surface.clone()));
            });
    }

    async fn type_text(&mut self, text: &str) -> Reaction {
        self.editor.type_text(text);
        self.expander
            .dispatch(EditorEvent::Input(Target::Editor))
            .await
            .unwrap()
    }

    async fn key(&mut self, key: &str) -> Reaction {
        let event = EditorEvent::KeyDown {
            target: Target::Editor,
            key: KeyPress::new(key),
        };
        self.expander.dispatch(event).await.unwrap()
    }

    fn current(&self) -> (String, String) {
        let m = self.expander.session().active_match().unwrap();
        (m.key.clone(), m.text.clone())
    }

    fn changes(&self) -> Vec<(String, String)> {
        self.changes.lock().unwrap().clone()
    }
}

fn options(names: &[&str]) -> Vec<OptionItem> {
    names.iter().map(|name| OptionItem::new(*name)).collect()
}

fn pair(key: &str, text: &str) -> (String, String) {
    (key.to_string(), text.to_string())
}

#[tokio::test]
async fn colon_key_announces_empty_capture() {
    let mut h = Harness::with_keys(vec![Key::single(":")]);
    h.serve(MemorySurface::new(options(&["smile"])));

    let reaction = h.type_text(":").await;

    assert_eq!(reaction, Reaction::Negotiated(Resolution::Activated));
    assert_eq!(h.changes(), vec![pair(":", "")]);
    assert_eq!(h.expander.session().active_match().unwrap().position, 1);
}

#[tokio::test]
async fn double_bracket_capture_grows() {
    let mut h = Harness::with_keys(vec![Key::single("[[")]);
    h.serve(MemorySurface::new(options(&["page"])));

    h.type_text("[[").await;
    h.type_text("a").await;
    h.type_text("b").await;

    assert_eq!(h.changes(), vec![pair("[[", ""), pair("[[", "a"), pair("[[", "ab")]);
}

#[tokio::test]
async fn multi_word_capture_never_re_anchors() {
    let mut h = Harness::with_keys(vec![Key::single("@"), Key::multi("#")]);
    h.serve(MemorySurface::new(options(&["step"])));

    for chunk in ["#step 1", " #step 2", " #step 3"] {
        h.type_text(chunk).await;
    }

    assert_eq!(h.current(), pair("#", "step 1 #step 2 #step 3"));
    assert_eq!(h.expander.session().active_match().unwrap().position, 1);
}

#[tokio::test]
async fn broken_single_word_falls_back_to_multi_word() {
    let mut h = Harness::with_keys(vec![Key::single("@"), Key::multi("#")]);
    h.serve(MemorySurface::new(options(&["x"])));

    h.type_text("#some text @match word").await;

    assert_eq!(h.current(), pair("#", "some text @match word"));
}

#[tokio::test]
async fn activation_toggles_aria_and_places_surface() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::new(options(&["alice", "bob"]));
    h.serve(surface.clone());

    h.type_text("hi @a").await;

    assert_eq!(h.editor.attribute("role").as_deref(), Some("combobox"));
    assert_eq!(h.editor.attribute("aria-multiline").as_deref(), Some("false"));
    assert!(surface.id().unwrap().starts_with("mentions-"));
    assert_eq!(surface.position(), Some((16.0, 32.0)));
    assert_eq!(h.navigators.selected(), Some(0));

    assert_eq!(h.key("Escape").await, Reaction::Key(KeyOutcome::Swallowed));
    assert_eq!(h.editor.attribute("role").as_deref(), Some("textbox"));
    assert_eq!(h.editor.attribute("aria-multiline"), None);
    assert!(!surface.is_connected());
    assert_eq!(h.navigators.live(), 0);
}

#[tokio::test]
async fn escape_holds_back_until_new_trigger() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["alice"])));

    h.type_text("@a").await;
    h.key("Escape").await;
    assert_eq!(h.expander.session().look_back(), 2);

    let reaction = h.type_text("l").await;
    assert_eq!(reaction, Reaction::Input(InputOutcome::Cleared { closed: false }));

    let reaction = h.type_text(" @b").await;
    assert_eq!(reaction, Reaction::Negotiated(Resolution::Activated));
    assert_eq!(h.current(), pair("@", "b"));
}

#[tokio::test]
async fn deleting_past_dismissal_reopens() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["alice"])));

    h.type_text("@al").await;
    h.key("Escape").await;

    h.editor.backspace();
    h.expander
        .dispatch(EditorEvent::Input(Target::Editor))
        .await
        .unwrap();
    h.editor.backspace();
    let reaction = h
        .expander
        .dispatch(EditorEvent::Input(Target::Editor))
        .await
        .unwrap();

    assert_eq!(reaction, Reaction::Negotiated(Resolution::Activated));
    assert_eq!(h.current(), pair("@", ""));
}

#[tokio::test]
async fn commit_replaces_capture_with_merged_object() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let option = OptionItem::new("Alice")
        .with_attribute("data-mention-attachment", r#"{"sgid":"a-hash","contentType":"x"}"#)
        .with_attribute("data-mention-attachment-content-type", "mention");
    h.serve(MemorySurface::new(vec![option.clone()]));

    h.type_text("hello @al").await;
    let reaction = h
        .expander
        .dispatch(EditorEvent::Commit(option))
        .await
        .unwrap();

    let Reaction::Commit(CommitOutcome::Inserted {
        range,
        object,
        cursor,
    }) = reaction
    else {
        panic!("expected an insertion, got {reaction:?}");
    };
    assert_eq!(range, 6..9);
    assert_eq!(cursor, 7);
    assert_eq!(object.get_str("content"), Some("Alice"));
    assert_eq!(object.get_str("sgid"), Some("a-hash"));
    assert_eq!(object.get_str("contentType"), Some("mention"));

    assert_eq!(h.editor.text(), format!("hello {OBJECT_REPLACEMENT}"));
    assert_eq!(h.editor.last_focus_prevented_scroll(), Some(true));
    assert_eq!(h.expander.session().look_back(), 7);
    assert_eq!(h.expander.session().phase(), Phase::Idle);
}

#[tokio::test]
async fn navigation_then_typing_commits_full_capture() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["amy", "azra"])));

    h.type_text("@a").await;
    assert_eq!(h.key("ArrowDown").await, Reaction::Key(KeyOutcome::Swallowed));
    h.type_text("z").await;
    h.key("ArrowDown").await;

    let Reaction::Key(KeyOutcome::Committed(CommitOutcome::Inserted { range, object, .. })) =
        h.key("Enter").await
    else {
        panic!("expected a committed option");
    };
    assert_eq!(range, 0..3);
    assert_eq!(object.get_str("content"), Some("azra"));
    assert_eq!(h.editor.text(), OBJECT_REPLACEMENT.to_string());
}

#[tokio::test]
async fn commit_veto_keeps_editor_untouched() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["alice"])));
    h.expander
        .session_mut()
        .on_commit_resolution(|resolution: &mut CommitResolution<'_>| resolution.cancel());

    h.type_text("@al").await;
    let reaction = h
        .expander
        .dispatch(EditorEvent::Commit(OptionItem::new("alice")))
        .await
        .unwrap();

    assert_eq!(reaction, Reaction::Commit(CommitOutcome::Vetoed));
    assert_eq!(h.editor.text(), "@al");
    assert!(h.expander.session().is_active());
}

#[tokio::test]
async fn document_surface_is_hidden_not_removed() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::in_document(options(&["alice"]));
    h.serve(surface.clone());

    h.type_text("@").await;
    assert!(!surface.is_hidden());

    let reaction = h.expander.dispatch(EditorEvent::Dismiss).await.unwrap();
    assert_eq!(reaction, Reaction::Closed(true));
    assert!(surface.is_connected());
    assert!(surface.is_hidden());
}

#[tokio::test]
async fn shadowed_focus_still_activates() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["alice"])));
    h.editor.set_focus(FocusTarget::ShadowedEditor);

    let reaction = h.type_text("@").await;
    assert_eq!(reaction, Reaction::Negotiated(Resolution::Activated));
}

#[tokio::test]
async fn unfocused_editor_refuses_surface() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::new(options(&["alice"]));
    h.serve(surface.clone());
    h.editor.set_focus(FocusTarget::Elsewhere);

    let reaction = h.type_text("@").await;
    assert_eq!(reaction, Reaction::Negotiated(Resolution::Refused));
    assert!(!surface.is_connected());
}

#[tokio::test]
async fn paste_skips_one_evaluation() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    h.serve(MemorySurface::new(options(&["alice"])));

    h.expander
        .dispatch(EditorEvent::Paste(Target::Editor))
        .await
        .unwrap();
    assert_eq!(h.type_text("@al").await, Reaction::Input(InputOutcome::Suppressed));
    assert!(h.changes().is_empty());

    assert_eq!(h.type_text("i").await, Reaction::Negotiated(Resolution::Activated));
    assert_eq!(h.changes(), vec![pair("@", "ali")]);
}

#[tokio::test]
async fn blur_closes_unless_pointer_is_down() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::new(options(&["alice"]));
    h.serve(surface.clone());

    h.type_text("@a").await;
    h.expander.dispatch(EditorEvent::PointerDown).await.unwrap();
    let reaction = h
        .expander
        .dispatch(EditorEvent::FocusOut(Target::Editor))
        .await
        .unwrap();
    assert_eq!(reaction, Reaction::Closed(false));
    assert!(surface.is_connected());

    let reaction = h
        .expander
        .dispatch(EditorEvent::FocusOut(Target::Editor))
        .await
        .unwrap();
    assert_eq!(reaction, Reaction::Closed(true));
    assert!(!surface.is_connected());
}

#[tokio::test]
async fn pointer_down_while_idle_does_not_shield_blur() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::in_document(options(&["alice"]));
    h.serve(surface.clone());

    h.expander.dispatch(EditorEvent::PointerDown).await.unwrap();
    assert_eq!(h.type_text("@a").await, Reaction::Negotiated(Resolution::Activated));

    let reaction = h
        .expander
        .dispatch(EditorEvent::FocusOut(Target::Editor))
        .await
        .unwrap();
    assert_eq!(reaction, Reaction::Closed(true));
    assert!(surface.is_hidden());
}

#[tokio::test]
async fn pointer_commit_does_not_shield_next_blur() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::new(options(&["alice"]));
    h.serve(surface.clone());

    h.type_text("@a").await;
    h.expander.dispatch(EditorEvent::PointerDown).await.unwrap();
    let reaction = h
        .expander
        .dispatch(EditorEvent::Commit(OptionItem::new("alice")))
        .await
        .unwrap();
    assert!(matches!(reaction, Reaction::Commit(CommitOutcome::Inserted { .. })));

    assert_eq!(h.type_text(" @a").await, Reaction::Negotiated(Resolution::Activated));
    let reaction = h
        .expander
        .dispatch(EditorEvent::FocusOut(Target::Editor))
        .await
        .unwrap();
    assert_eq!(reaction, Reaction::Closed(true));
    assert!(!surface.is_connected());
}

#[tokio::test]
async fn cancelled_change_closes_the_menu() {
    let mut h = Harness::with_keys(vec![Key::single("@")]);
    let surface = MemorySurface::new(options(&["alice"]));
    h.serve(surface.clone());
    h.expander
        .session_mut()
        .on_match_change(|change: &mut MatchChange| {
            if change.text() == "x" {
                change.cancel();
            }
        });

    h.type_text("@").await;
    assert!(surface.is_connected());

    let reaction = h.type_text("x").await;
    assert_eq!(reaction, Reaction::Negotiated(Resolution::Closed { closed: true }));
    assert!(!surface.is_connected());
}

fn frame_options(frames: &Arc<MemoryFrames>) -> SessionOptions {
    SessionOptions::new(KeySet::new(vec![Key::single("@")])).with_remote(RemoteFrame::new(
        "query",
        "menu",
        frames.clone(),
    ))
}

#[tokio::test]
async fn remote_frame_receives_query() {
    let frames = Arc::new(MemoryFrames::new());
    let frame = frames.insert("menu", MemoryFrame::new("/path", options(&["ada", "bob"])));
    let mut h = Harness::new(frame_options(&frames));

    let reaction = h.type_text("@a").await;

    assert_eq!(reaction, Reaction::Negotiated(Resolution::Activated));
    assert_eq!(frame.src(), "/path?query=a");
    assert!(!frame.is_hidden());
}

#[tokio::test]
async fn remote_frame_keeps_other_params() {
    let frames = Arc::new(MemoryFrames::new());
    let frame = frames.insert("menu", MemoryFrame::new("/path?c=d", options(&["ada"])));
    let mut h = Harness::new(frame_options(&frames));

    h.type_text("@a").await;

    assert_eq!(frame.src(), "/path?c=d&query=a");
}

#[tokio::test]
async fn remote_frame_without_content_closes() {
    let frames = Arc::new(MemoryFrames::new());
    let frame = frames.insert("menu", MemoryFrame::new("/path", options(&["ada"])));
    let mut h = Harness::new(frame_options(&frames));

    let reaction = h.type_text("@z").await;

    assert_eq!(reaction, Reaction::Negotiated(Resolution::Closed { closed: false }));
    assert_eq!(frame.src(), "/path?query=z");
    assert!(frame.is_hidden());
}

#[tokio::test]
async fn disabled_frame_is_left_alone() {
    let frames = Arc::new(MemoryFrames::new());
    let frame = frames.insert(
        "menu",
        MemoryFrame::new("/path", options(&["ada"])).disabled(),
    );
    let mut h = Harness::new(frame_options(&frames));

    let reaction = h.type_text("@a").await;

    assert_eq!(reaction, Reaction::Negotiated(Resolution::Closed { closed: false }));
    assert_eq!(frame.src(), "/path");
}

#[test]
fn plain_text_editor_is_rejected() {
    let result = Session::attach(
        Box::new(MemoryHost::new(MemoryEditor::plain("textarea"))),
        SessionOptions::default(),
        Arc::new(MemoryNavigators::new()),
    );

    match result {
        Err(MentionsError::Usage(UsageError::UnsupportedEditor(name))) => {
            assert_eq!(name, "textarea")
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("attach should fail"),
    }
}

#[test]
fn missing_editor_is_rejected() {
    let result = Session::attach(
        Box::new(MemoryHost::empty()),
        SessionOptions::default(),
        Arc::new(MemoryNavigators::new()),
    );
    assert!(matches!(
        result,
        Err(MentionsError::Usage(UsageError::EditorMissing))
    ));
}
