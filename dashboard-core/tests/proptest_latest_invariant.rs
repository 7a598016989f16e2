//! Property-based tests for the single-latest-version rule

mod common;

use proptest::prelude::*;
use std::collections::HashMap;

use dashboard_core::domain::federation::IApplicationVersionRepository;
use dashboard_core::infrastructure::InMemoryDriver;

#[derive(Debug, Clone)]
struct Save {
    app: usize,
    env: usize,
    version: usize,
    latest: bool,
}

fn save_strategy() -> impl Strategy<Value = Save> {
    (0..2usize, 0..2usize, 0..4usize, any::<bool>()).prop_map(|(app, env, version, latest)| Save {
        app,
        env,
        version,
        latest,
    })
}

const APPS: [&str; 2] = ["shell", "nav"];
const ENVS: [&str; 2] = ["development", "production"];

proptest! {
    #[test]
    fn test_at_most_one_latest_per_environment(saves in prop::collection::vec(save_strategy(), 1..40)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let driver = InMemoryDriver::new();
            let mut last_latest: HashMap<(usize, usize), usize> = HashMap::new();

            for save in &saves {
                let mut v = common::version(
                    APPS[save.app],
                    ENVS[save.env],
                    &format!("1.0.{}", save.version),
                    0,
                );
                v.latest = save.latest;
                driver.save(&v).await.unwrap();

                let slot = (save.app, save.env);
                if save.latest {
                    last_latest.insert(slot, save.version);
                } else if last_latest.get(&slot) == Some(&save.version) {
                    last_latest.remove(&slot);
                }
            }

            for (a, app) in APPS.iter().enumerate() {
                for (e, env) in ENVS.iter().enumerate() {
                    let latest: Vec<_> = driver
                        .find_all(app, Some(env))
                        .await
                        .unwrap()
                        .into_iter()
                        .filter(|v| v.latest)
                        .collect();

                    prop_assert!(latest.len() <= 1);
                    let expected = last_latest.get(&(a, e)).map(|n| format!("1.0.{}", n));
                    prop_assert_eq!(latest.first().map(|v| v.version.clone()), expected);
                }
            }
            Ok(())
        })?;
    }

    #[test]
    fn test_resave_keeps_identity_unique(count in 1..10usize) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let driver = InMemoryDriver::new();
            for _ in 0..count {
                driver.save(&common::version("shell", "production", "2.0.0", 0)).await.unwrap();
            }
            let all = driver.find_all("shell", None).await.unwrap();
            prop_assert_eq!(all.len(), 1);
            Ok(())
        })?;
    }
}
