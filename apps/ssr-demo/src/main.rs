use std::cell::RefCell;
use std::rc::Rc;

use head_core::{
    Declaration, DeclarationScope, HeadObject, HeadScope, Link, MemoryDocument, MetaOptions,
    Registry,
};

fn layout_head() -> HeadObject {
    HeadObject::new()
        .title("Home")
        .meta(MetaOptions::charset("utf-8"))
        .meta(MetaOptions::named("viewport", "width=device-width, initial-scale=1"))
        .meta(MetaOptions::named("description", "Documentation"))
}

fn article_head(slug: &str) -> HeadObject {
    HeadObject::new()
        .title(format!("Article: {slug}"))
        .meta(MetaOptions::named("description", format!("All about {slug}")))
        .meta(MetaOptions::property("og:title", slug))
}

fn render_page(head: &head_core::HeadSnapshot) -> String {
    format!(
        "<!doctype html><html {}><head>{}</head><body></body></html>",
        head.html_attributes(),
        head
    )
}

fn main() {
    env_logger::init();

    println!("=== head-core server render + hydration ===");
    println!();

    let registry = Registry::new();

    let mut template = DeclarationScope::new(registry.clone());
    let mut lang = DeclarationScope::new(registry.clone());
    let mut canonical = DeclarationScope::new(registry.clone());
    let mut layout = HeadScope::new(registry.clone());
    let mut article = HeadScope::new(registry.clone());

    // Server pass: no environment yet, so evaluation queues directly.
    template.evaluate(Some(Declaration::title_template("%s | Field Notes")));
    lang.evaluate(Some(Declaration::lang("en")));
    canonical.evaluate(Some(Link::new("canonical", "https://example.com/articles/slots").into()));
    layout.evaluate(&layout_head());
    article.evaluate(&article_head("slots"));

    println!("server html:");
    println!("{}", render_page(&registry.snapshot()));
    println!();

    // Client pass: attach a document and commit; nothing is re-applied.
    let document = Rc::new(RefCell::new(MemoryDocument::new()));
    registry.attach_applier(Rc::clone(&document));
    for scope in [&mut template, &mut lang, &mut canonical] {
        scope.commit();
    }
    layout.commit();
    article.commit();
    log::info!("hydrated with {} document writes", document.borrow().writes());

    // Navigate to another article: same component, new declarations.
    article.evaluate(&article_head("effects"));
    article.commit();
    canonical.evaluate(Some(Link::new("canonical", "https://example.com/articles/effects").into()));
    canonical.commit();
    println!("after navigation: {:?}", document.borrow().title());

    // Leave the article entirely: the layout's declarations take over again.
    drop(article);
    println!("after unmount:    {:?}", document.borrow().title());
    println!("document writes:  {}", document.borrow().writes());
    println!();
    println!("final head: {}", registry.to_html());
}
