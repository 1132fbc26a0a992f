//! The sample suite under `demos/` stays loadable

use std::path::PathBuf;

use a11y_e2e::spec::LoadState;
use a11y_e2e::{AxeScanner, ScanSpec, ScanStep, SuiteConfig};
use a11y_report::WcagLevel;

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demo_config_parses() {
    let config = SuiteConfig::from_file(&demos_dir().join("a11y.yaml")).unwrap();
    assert_eq!(config.workers, 2);
    assert_eq!(config.global_exclusions.len(), 3);
    assert!(config.policy.fail_on_unknown);
}

#[test]
fn demo_specs_load_sorted_by_file() {
    let specs = ScanSpec::load_all(&demos_dir().join("specs")).unwrap();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Authenticated Dashboard", "Glossary Tab", "Home Page", "Search Results"]
    );

    let glossary = &specs[1];
    assert!(matches!(glossary.wcag, WcagLevel::AAA));
    assert!(glossary.setup.is_empty());
    assert!(matches!(
        glossary.interact[1],
        ScanStep::WaitForLoad { state: LoadState::DomContentLoaded }
    ));

    let search = &specs[3];
    assert!(search.setup.is_empty());
    assert_eq!(search.interact.len(), 3);

    let dashboard = &specs[0];
    assert_eq!(dashboard.setup.len(), 6);
    assert!(dashboard.interact.is_empty());
    assert_eq!(dashboard.settle_ms, 1000);
}

#[test]
fn demo_scripts_generate() {
    let config = SuiteConfig::from_file(&demos_dir().join("a11y.yaml")).unwrap();
    let scanner = AxeScanner::new(config.playwright_config());

    for spec in ScanSpec::load_all(&demos_dir().join("specs")).unwrap() {
        let script = scanner.build_script(&spec, &spec.exclusions(&config.global_exclusions));
        assert!(script.contains("A11Y_RESULT:"), "{}", spec.name);
        assert!(script.contains("#cookie-banner"), "{}", spec.name);

        if spec.setup.is_empty() && !spec.interact.is_empty() {
            let goto = script
                .find(&format!("await page.goto(resolve(\"{}\"))", spec.url))
                .unwrap();
            let analyze = script.find("builder.analyze()").unwrap();
            let first_action = ["page.click(", "page.fill("]
                .iter()
                .filter_map(|call| script.find(call))
                .min()
                .unwrap();
            assert!(goto < first_action && first_action < analyze, "{}", spec.name);
        }
    }
}
