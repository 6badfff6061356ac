//! Tests for manifest dependency extraction.

use skilltrace::analysis::ManifestKind;
use skilltrace::analysis::manifests::{
    cargo_dependencies, go_mod_dependencies, package_json_dependencies, pom_dependencies,
    requirements_dependencies,
};

#[test]
fn test_package_json_sections() {
    let deps = package_json_dependencies(
        r#"{
            "name": "web",
            "dependencies": {"react": "^18.2.0", "zod": "3"},
            "devDependencies": {"vitest": "^1.0.0"},
            "peerDependencies": {"react-dom": "*"},
            "scripts": {"build": "vite build"}
        }"#,
    );
    for name in ["react", "zod", "vitest", "react-dom"] {
        assert!(deps.contains(&name.to_string()), "missing {name}");
    }
    assert!(!deps.contains(&"build".to_string()));
}

#[test]
fn test_package_json_keeps_declaration_order() {
    let deps = package_json_dependencies(
        r#"{"dependencies":{"zod":"3","react":"18"},"devDependencies":{"axios":"1"}}"#,
    );
    assert_eq!(deps, vec!["zod", "react", "axios"]);
}

#[test]
fn test_cargo_keeps_declaration_order() {
    let deps = cargo_dependencies("[dependencies]\ntokio = \"1\"\nanyhow = \"1\"\n");
    assert_eq!(deps, vec!["tokio", "anyhow"]);
}

#[test]
fn test_package_json_invalid_is_empty() {
    assert!(package_json_dependencies("{ not json").is_empty());
}

#[test]
fn test_requirements_lines() {
    let deps = requirements_dependencies(
        "# web stack\n\
         Django>=4.2\n\
         requests==2.31.0  # pinned\n\
         -r base.txt\n\
         --index-url https://pypi.example\n\
         \n\
         uvicorn[standard]~=0.23\n\
         numpy ; python_version > '3.8'\n\
         mypkg @ git+https://example.com/mypkg\n",
    );
    assert_eq!(deps, vec!["Django", "requests", "uvicorn", "numpy", "mypkg"]);
}

#[test]
fn test_pom_artifact_ids() {
    let deps = pom_dependencies(
        r#"<project>
          <artifactId>my-app</artifactId>
          <dependencies>
            <dependency>
              <groupId>org.springframework.boot</groupId>
              <artifactId>spring-boot-starter-web</artifactId>
            </dependency>
            <dependency>
              <groupId>junit</groupId>
              <artifactId> junit </artifactId>
              <scope>test</scope>
            </dependency>
          </dependencies>
        </project>"#,
    );
    assert_eq!(deps, vec!["spring-boot-starter-web", "junit"]);
}

#[test]
fn test_cargo_tables() {
    let deps = cargo_dependencies(
        r#"
[package]
name = "demo"

[dependencies]
serde = { version = "1", features = ["derive"] }
tokio = "1"

[dev-dependencies]
tempfile = "3"

[build-dependencies]
cc = "1"
"#,
    );
    for name in ["serde", "tokio", "tempfile", "cc"] {
        assert!(deps.contains(&name.to_string()), "missing {name}");
    }
    assert!(!deps.contains(&"name".to_string()));
}

#[test]
fn test_go_mod_require_forms() {
    let deps = go_mod_dependencies(
        "module example.com/app\n\
         \n\
         go 1.22\n\
         \n\
         require github.com/spf13/cobra v1.8.0\n\
         \n\
         require (\n\
         \tgithub.com/gin-gonic/gin v1.9.1\n\
         \tgolang.org/x/sync v0.6.0 // indirect\n\
         )\n",
    );
    assert_eq!(
        deps,
        vec![
            "github.com/spf13/cobra",
            "github.com/gin-gonic/gin",
            "golang.org/x/sync",
        ]
    );
}

#[test]
fn test_kind_dispatch() {
    assert_eq!(ManifestKind::Requirements.file_name(), "requirements.txt");
    assert_eq!(ManifestKind::Requirements.extract("flask\n"), vec!["flask"]);
    assert_eq!(ManifestKind::ALL.len(), 5);
}
