//! Dependency extraction from well-known manifest files

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;
use toml::Value as TomlValue;

/// Manifest formats the analyzer knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    Requirements,
    Pom,
    Cargo,
    GoMod,
}

impl ManifestKind {
    /// Every supported manifest, in probe order.
    pub const ALL: [ManifestKind; 5] = [
        ManifestKind::PackageJson,
        ManifestKind::Requirements,
        ManifestKind::Pom,
        ManifestKind::Cargo,
        ManifestKind::GoMod,
    ];

    /// Path of the manifest at the repository root.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::Requirements => "requirements.txt",
            Self::Pom => "pom.xml",
            Self::Cargo => "Cargo.toml",
            Self::GoMod => "go.mod",
        }
    }

    /// Dependency names declared in `content`; empty when unparseable.
    #[must_use]
    pub fn extract(&self, content: &str) -> Vec<String> {
        match self {
            Self::PackageJson => package_json_dependencies(content),
            Self::Requirements => requirements_dependencies(content),
            Self::Pom => pom_dependencies(content),
            Self::Cargo => cargo_dependencies(content),
            Self::GoMod => go_mod_dependencies(content),
        }
    }
}

/// Keys of `dependencies`, `devDependencies` and `peerDependencies`
#[must_use]
pub fn package_json_dependencies(content: &str) -> Vec<String> {
    let Ok(json) = serde_json::from_str::<JsonValue>(content) else {
        return Vec::new();
    };
    ["dependencies", "devDependencies", "peerDependencies"]
        .iter()
        .filter_map(|section| json.get(section).and_then(JsonValue::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// One requirement per line; comments, blank lines and pip options skipped
#[must_use]
pub fn requirements_dependencies(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() || line.starts_with('-') {
                return None;
            }
            let name = line
                .split(|c: char| "=<>!~;[@ \t".contains(c))
                .next()
                .unwrap_or("")
                .trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// `artifactId` of each `<dependency>` block
#[must_use]
pub fn pom_dependencies(content: &str) -> Vec<String> {
    lazy_static! {
        static ref DEPENDENCY_RE: Result<Regex, regex::Error> = Regex::new(
            r"(?s)<dependency>.*?<artifactId>\s*([^<\s]+)\s*</artifactId>.*?</dependency>"
        );
    }

    let Ok(dependency_re) = DEPENDENCY_RE.as_ref() else {
        return Vec::new();
    };

    dependency_re
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Keys of the Cargo dependency tables
#[must_use]
pub fn cargo_dependencies(content: &str) -> Vec<String> {
    let Ok(manifest) = toml::from_str::<toml::Table>(content) else {
        return Vec::new();
    };
    ["dependencies", "dev-dependencies", "build-dependencies"]
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(TomlValue::as_table))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Module paths from `require` lines and blocks
#[must_use]
pub fn go_mod_dependencies(content: &str) -> Vec<String> {
    let mut deps = Vec::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let trimmed = line.split("//").next().unwrap_or("").trim();

        if trimmed.starts_with("require (") || trimmed == "require(" {
            in_require_block = true;
            continue;
        }
        if in_require_block && trimmed.starts_with(')') {
            in_require_block = false;
            continue;
        }

        let spec = if in_require_block {
            trimmed
        } else if let Some(rest) = trimmed.strip_prefix("require ") {
            rest.trim()
        } else {
            continue;
        };

        if let Some(module) = spec.split_whitespace().next() {
            deps.push(module.to_string());
        }
    }

    deps
}
