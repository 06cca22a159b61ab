//! Three-package fixture: `foo` lives on its own, `@workspace/bar` and
//! `@workspace/baz` share one npm workspace lockfile.
//!
//! ```text
//! foo/                      package.json, package-lock.json
//! workspace/                package.json, package-lock.json (bar + baz)
//! workspace/bar/            package.json
//! workspace/baz/            package.json
//! ```
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use portal_link::{Lockfile, LOCKFILE_NAME, MANIFEST_NAME};
use portal_mesh::Announcement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pkg {
    Foo,
    Bar,
    Baz,
}

pub const ALL: [Pkg; 3] = [Pkg::Foo, Pkg::Bar, Pkg::Baz];

impl Pkg {
    pub fn name(self) -> &'static str {
        match self {
            Pkg::Foo => "foo",
            Pkg::Bar => "@workspace/bar",
            Pkg::Baz => "@workspace/baz",
        }
    }

    /// Package directory relative to the fixture root.
    pub fn dir(self) -> &'static str {
        match self {
            Pkg::Foo => "foo",
            Pkg::Bar => "workspace/bar",
            Pkg::Baz => "workspace/baz",
        }
    }

    /// Outputs the package exposes to its dependents.
    pub fn outputs(self) -> &'static [&'static str] {
        match self {
            Pkg::Foo => &["dist_foo"],
            Pkg::Bar => &["dist_bar_1", "dist_bar_2"],
            Pkg::Baz => &["dist_baz"],
        }
    }

    /// Directory of the lockfile this package's process reads.
    pub fn lockfile_dir(self) -> &'static str {
        match self {
            Pkg::Foo => "foo",
            Pkg::Bar | Pkg::Baz => "workspace",
        }
    }
}

const FOO_LOCK: &str = r#"{
  "name": "foo",
  "lockfileVersion": 3,
  "packages": {
    "": { "name": "foo", "dependencies": { "@workspace/bar": "*", "@workspace/baz": "*", "nested": "*" } },
    "node_modules/@workspace/bar": { "version": "1.0.0" },
    "node_modules/@workspace/baz": { "version": "1.0.0" },
    "node_modules/nested": { "version": "1.0.0" },
    "node_modules/nested/node_modules/@workspace/baz": { "version": "0.9.0" }
  }
}"#;

const WORKSPACE_LOCK: &str = r#"{
  "name": "workspace",
  "lockfileVersion": 3,
  "packages": {
    "": { "name": "workspace", "workspaces": ["bar", "baz"] },
    "bar": { "name": "@workspace/bar", "dependencies": { "@workspace/baz": "*" } },
    "baz": { "name": "@workspace/baz", "dependencies": { "foo": "*", "@workspace/bar": "1.0.0" } },
    "node_modules/@workspace/bar": { "version": "1.0.0" },
    "node_modules/foo": { "version": "1.0.0" },
    "bar/node_modules/@workspace/baz": { "resolved": "baz", "link": true },
    "baz/node_modules/foo": { "version": "1.0.0" },
    "baz/node_modules/@workspace/bar": { "version": "1.0.0" }
  }
}"#;

/// One expected link: where it lives, what it points at, who provides the
/// output, and which processes read the lockfile containing the entry.
struct ExpectedLink {
    path: &'static str,
    target: &'static str,
    provider: Pkg,
    consumers: &'static [Pkg],
}

const EXPECTED: &[ExpectedLink] = &[
    ExpectedLink {
        path: "foo/node_modules/@workspace/bar/dist_bar_1",
        target: "workspace/bar/dist_bar_1",
        provider: Pkg::Bar,
        consumers: &[Pkg::Foo],
    },
    ExpectedLink {
        path: "foo/node_modules/@workspace/bar/dist_bar_2",
        target: "workspace/bar/dist_bar_2",
        provider: Pkg::Bar,
        consumers: &[Pkg::Foo],
    },
    ExpectedLink {
        path: "foo/node_modules/@workspace/baz/dist_baz",
        target: "workspace/baz/dist_baz",
        provider: Pkg::Baz,
        consumers: &[Pkg::Foo],
    },
    ExpectedLink {
        path: "foo/node_modules/nested/node_modules/@workspace/baz/dist_baz",
        target: "workspace/baz/dist_baz",
        provider: Pkg::Baz,
        consumers: &[Pkg::Foo],
    },
    ExpectedLink {
        path: "workspace/node_modules/@workspace/bar/dist_bar_1",
        target: "workspace/bar/dist_bar_1",
        provider: Pkg::Bar,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
    ExpectedLink {
        path: "workspace/node_modules/@workspace/bar/dist_bar_2",
        target: "workspace/bar/dist_bar_2",
        provider: Pkg::Bar,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
    ExpectedLink {
        path: "workspace/node_modules/foo/dist_foo",
        target: "foo/dist_foo",
        provider: Pkg::Foo,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
    ExpectedLink {
        path: "workspace/baz/node_modules/foo/dist_foo",
        target: "foo/dist_foo",
        provider: Pkg::Foo,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
    ExpectedLink {
        path: "workspace/baz/node_modules/@workspace/bar/dist_bar_1",
        target: "workspace/bar/dist_bar_1",
        provider: Pkg::Bar,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
    ExpectedLink {
        path: "workspace/baz/node_modules/@workspace/bar/dist_bar_2",
        target: "workspace/bar/dist_bar_2",
        provider: Pkg::Bar,
        consumers: &[Pkg::Bar, Pkg::Baz],
    },
];

/// Entry the package manager already linked; must never become a symlink.
pub const NEVER_LINKED: &str = "workspace/bar/node_modules/@workspace/baz/dist_baz";

/// Links (path -> target, both relative to the fixture root) that must
/// exist once exactly the packages in `started` are running.
pub fn expected_links(started: &[Pkg]) -> BTreeMap<String, String> {
    EXPECTED
        .iter()
        .filter(|link| started.contains(&link.provider))
        .filter(|link| link.consumers.iter().any(|c| started.contains(c)))
        .map(|link| (link.path.to_string(), link.target.to_string()))
        .collect()
}

pub struct Fixture {
    pub root: PathBuf,
}

impl Fixture {
    /// Write the fixture under `base` (which must exist).
    pub fn create(base: &Path) -> Self {
        let root = std::fs::canonicalize(base).unwrap().join("env");
        let write = |rel: &str, contents: &str| {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        };

        write(&format!("foo/{MANIFEST_NAME}"), r#"{ "name": "foo" }"#);
        write(&format!("foo/{LOCKFILE_NAME}"), FOO_LOCK);
        write(
            &format!("workspace/{MANIFEST_NAME}"),
            r#"{ "name": "workspace", "workspaces": ["bar", "baz"] }"#,
        );
        write(&format!("workspace/{LOCKFILE_NAME}"), WORKSPACE_LOCK);
        write(
            &format!("workspace/bar/{MANIFEST_NAME}"),
            r#"{ "name": "@workspace/bar" }"#,
        );
        write(
            &format!("workspace/baz/{MANIFEST_NAME}"),
            r#"{ "name": "@workspace/baz" }"#,
        );

        // Installed copy that the portal replaces with a link
        write("foo/node_modules/@workspace/bar/dist_bar_1/index.js", "stale");

        Self { root }
    }

    pub fn package_dir(&self, pkg: Pkg) -> PathBuf {
        self.root.join(pkg.dir())
    }

    pub fn lockfile(&self, pkg: Pkg) -> Lockfile {
        Lockfile::load(&self.root.join(pkg.lockfile_dir()).join(LOCKFILE_NAME)).unwrap()
    }

    pub fn announcement(&self, pkg: Pkg) -> Announcement {
        Announcement::new(
            pkg.name(),
            self.package_dir(pkg),
            pkg.outputs().iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Every symlink under the fixture, as relative path -> relative target.
    pub fn symlinks(&self) -> BTreeMap<String, String> {
        let mut links = BTreeMap::new();
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let Ok(read) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in read.flatten() {
                let path = entry.path();
                let Ok(meta) = std::fs::symlink_metadata(&path) else {
                    continue;
                };
                if meta.file_type().is_symlink() {
                    let Ok(target) = std::fs::read_link(&path) else {
                        continue;
                    };
                    links.insert(self.relative(&path), self.relative(&target));
                } else if meta.is_dir() {
                    stack.push(path);
                }
            }
        }
        links
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// All orderings of `items`.
pub fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}
