use head_core::{Declaration, HeadObject, Kind, Link, MetaOptions, QueueChange};
use head_testing::TestHost;

fn description(content: &str) -> MetaOptions {
    MetaOptions::named("description", content)
}

#[test]
fn siblings_declaring_the_same_meta_hand_over_on_unmount() {
    let mut host = TestHost::client();
    host.mount("first", &HeadObject::new().meta(description("first")));
    host.mount("second", &HeadObject::new().meta(description("second")));
    assert_eq!(host.head().metas()[0].content(), Some("second"));

    host.unmount("second");
    assert_eq!(host.head().metas()[0].content(), Some("first"));

    host.unmount("first");
    assert!(host.head().metas().is_empty());
}

#[test]
fn unmounting_the_first_sibling_keeps_the_second_current() {
    let mut host = TestHost::client();
    host.mount("first", &HeadObject::new().title("First"));
    host.mount("second", &HeadObject::new().title("Second"));

    host.unmount("first");

    assert_eq!(host.head().title(), Some("Second"));
    assert_eq!(host.registry().len(Kind::Title), 1);
}

#[test]
fn updating_an_outer_component_does_not_override_inner() {
    let mut host = TestHost::client();
    host.mount("layout", &HeadObject::new().title("Site"));
    host.mount("page", &HeadObject::new().title("Article"));

    host.update("layout", &HeadObject::new().title("Site v2"));

    assert_eq!(host.head().title(), Some("Article"));
    host.unmount("page");
    assert_eq!(host.head().title(), Some("Site v2"));
}

#[test]
fn reordering_metas_is_free() {
    let mut host = TestHost::client();
    let og = MetaOptions::property("og:title", "Home");
    host.mount(
        "page",
        &HeadObject::new().meta(description("x")).meta(og.clone()),
    );
    host.log().take();

    host.update("page", &HeadObject::new().meta(og).meta(description("x")));

    assert!(host.log().is_empty());
}

#[test]
fn long_sequence_ends_empty() {
    let mut host = TestHost::client();
    let steps = [
        HeadObject::new().title("A").meta(description("1")),
        HeadObject::new()
            .title("B")
            .meta(description("2"))
            .meta(MetaOptions::named("keywords", "k")),
        HeadObject::new().meta(MetaOptions::named("keywords", "k")),
        HeadObject::new()
            .meta(MetaOptions::charset("utf-8"))
            .meta(MetaOptions::http_equiv("refresh", "30")),
        HeadObject::new(),
        HeadObject::new().title("C").meta(description("3")),
    ];
    for step in &steps {
        host.update("page", step);
        host.update("sibling", &HeadObject::new().meta(description("sibling")));
    }

    host.unmount("page");
    let remaining = host.registry().entries(Kind::Meta);
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining[0].declaration(),
        &Declaration::from(description("sibling"))
    );
    assert_eq!(host.registry().len(Kind::Title), 0);

    host.unmount_all();
    assert!(host.registry().is_empty());
}

#[test]
fn change_in_place_emits_no_add_or_remove() {
    let mut host = TestHost::client();
    host.mount("page", &HeadObject::new().meta(description("x")));
    host.log().take();

    host.update("page", &HeadObject::new().meta(description("y")));

    let changes = host.log().take();
    assert_eq!(changes.len(), 1);
    assert!(matches!(changes[0], QueueChange::Changed { .. }));
}

#[test]
fn server_render_then_hydrate() {
    let mut host = TestHost::server();
    host.render("layout", &HeadObject::new().title("Site"));
    host.render("page", &HeadObject::new().title("Post").meta(description("p")));

    let html = host.registry().to_html();
    assert_eq!(
        html,
        "<title>Post</title><meta name=\"description\" content=\"p\">"
    );

    let log = host.hydrate();
    log.take();
    host.commit_all();
    assert!(log.is_empty());

    host.update("page", &HeadObject::new().title("Post 2").meta(description("p")));
    assert_eq!(log.count(Kind::Title), 1);
    assert_eq!(log.head().title(), Some("Post 2"));
}

#[test]
fn standalone_link_scope() {
    let host = TestHost::client();
    let mut scope = head_core::DeclarationScope::new(host.registry().clone());
    scope.evaluate(Some(Link::new("canonical", "/a").into()));
    scope.commit();
    scope.evaluate(Some(Link::new("canonical", "/b").into()));
    scope.commit();

    assert_eq!(host.head().links(), &[Link::new("canonical", "/b")]);
    drop(scope);
    assert!(host.head().links().is_empty());
}
