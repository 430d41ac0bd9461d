//! Integration tests for sources and the source map

use weft_foundation::{ErrorKind, SourceId};
use weft_language::SourceMap;

#[test]
fn sources_are_numbered_in_load_order() {
    let mut sources = SourceMap::new();
    let a = sources.load_string("a.w", "alpha");
    let b = sources.load_string("b.w", "beta");

    assert_eq!(a, SourceId(0));
    assert_eq!(b, SourceId(1));
    assert_eq!(sources.len(), 2);
    assert_eq!(sources.source(b).text(), "beta");
    assert_eq!(sources.source(a).span().len(), 5);
    assert!(sources.get(SourceId(7)).is_none());
}

#[test]
fn files_resolve_against_the_base_path() {
    let dir = std::env::temp_dir().join(format!("weft-language-files-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("lib")).unwrap();
    std::fs::write(dir.join("lib").join("util.w"), "util").unwrap();

    let mut sources = SourceMap::new().with_base_path(&dir);
    let id = sources.load_file("lib/util.w").unwrap();
    assert_eq!(sources.source(id).name(), "lib/util.w");
    assert_eq!(sources.load_file("lib/util.w").unwrap(), id);

    let err = sources.load_file("lib/missing.w").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SourceLoad { .. }));

    std::fs::remove_dir_all(&dir).ok();
}
