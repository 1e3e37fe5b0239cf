//! Shared fixtures for unit tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use semver::Version;

use crate::package::{PACKAGE_META_FILE, PackageMeta};

pub(crate) fn meta(name: &str, version: &str, deps: &[(&str, &str)]) -> PackageMeta {
    PackageMeta {
        name: name.into(),
        version: Version::parse(version).unwrap(),
        description: None,
        dependencies: deps
            .iter()
            .map(|(n, r)| (n.to_string(), r.to_string()))
            .collect(),
    }
}

/// Writes a `.plugin` archive containing the descriptor plus a payload file.
pub(crate) fn write_archive(path: &Path, meta: &PackageMeta) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.start_file(PACKAGE_META_FILE, options).unwrap();
    zip.write_all(serde_json::to_string_pretty(meta).unwrap().as_bytes())
        .unwrap();
    zip.start_file("payload.txt", options).unwrap();
    zip.write_all(b"payload\n").unwrap();
    zip.finish().unwrap();
}

/// Materializes an installed package directory under `packages_dir`.
pub(crate) fn install_package(packages_dir: &Path, meta: &PackageMeta) {
    let dir = packages_dir.join(meta.dir_name());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(PACKAGE_META_FILE),
        serde_json::to_string_pretty(meta).unwrap(),
    )
    .unwrap();
}
