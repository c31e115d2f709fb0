use head_core::{HeadObject, Kind, Lifecycle, MetaOptions};
use head_testing::TestHost;

#[test]
fn client_host_records_mount_and_unmount() {
    let mut host = TestHost::client();
    host.mount("page", &HeadObject::new().title("Home"));
    assert_eq!(host.log().count(Kind::Title), 1);
    assert_eq!(
        host.scope("page").map(|scope| scope.lifecycle()),
        Some(Lifecycle::Mounted)
    );

    assert!(host.unmount("page"));
    assert!(!host.unmount("page"));
    assert_eq!(host.log().len(), 2);
    assert!(host.registry().is_empty());
}

#[test]
fn server_host_collects_without_commit() {
    let mut host = TestHost::server();
    host.render("page", &HeadObject::new().meta(MetaOptions::charset("utf-8")));
    assert_eq!(host.head().to_html(), "<meta charset=\"utf-8\">");

    let log = host.hydrate();
    assert_eq!(log.count(Kind::Meta), 1);
    host.commit_all();
    assert_eq!(log.len(), 1);
}
