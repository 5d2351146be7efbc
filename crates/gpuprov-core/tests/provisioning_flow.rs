//! End-to-end provisioning flow over in-memory adapters.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gpuprov_core::{
    AttemptStep, CudaRepoCandidate, InstallOutcome, LadderEntry, OsProfile, PackageArch,
    PackageManagerError, PackageManagerPort, PlanExecutor, PlanRequest, PlanStatus, PlanWarning,
    ProvisionError, ReleaseIndexError, ReleaseIndexPort, ResolverService, TargetSource,
    UserChoice, VersionTarget,
};

fn v(major: u32, minor: u32) -> VersionTarget {
    VersionTarget::new(major, minor)
}

/// Repositories that can be configured and the packages each one ships.
#[derive(Default)]
struct FakePackageManager {
    repos: HashMap<String, HashSet<String>>,
    configured: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
    generic_version: Option<VersionTarget>,
}

impl FakePackageManager {
    fn with_repo(mut self, repo: &str, packages: &[&str]) -> Self {
        self.repos.insert(
            repo.to_string(),
            packages.iter().map(ToString::to_string).collect(),
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageManagerPort for FakePackageManager {
    async fn configure_repository(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<(), PackageManagerError> {
        self.calls.lock().unwrap().push(format!("configure {repo}"));
        if self.repos.contains_key(repo.as_str()) {
            *self.configured.lock().unwrap() = Some(repo.to_string());
            Ok(())
        } else {
            Err(PackageManagerError::RepositoryUnreachable {
                repo: repo.to_string(),
                reason: "404 Not Found".to_string(),
            })
        }
    }

    async fn install_package(&self, package: &str) -> Result<(), PackageManagerError> {
        self.calls.lock().unwrap().push(format!("install {package}"));
        let configured = self.configured.lock().unwrap().clone();
        let available = configured
            .and_then(|repo| self.repos.get(&repo))
            .is_some_and(|packages| packages.contains(package));
        if available {
            Ok(())
        } else {
            Err(PackageManagerError::PackageUnavailable {
                package: package.to_string(),
                reason: "no installation candidate".to_string(),
            })
        }
    }

    async fn installed_toolkit_version(&self) -> Option<VersionTarget> {
        self.generic_version
    }
}

/// Repository listings keyed by repo id; missing ids are unreachable.
struct FakeReleaseIndex {
    listings: HashMap<String, Option<VersionTarget>>,
}

#[async_trait]
impl ReleaseIndexPort for FakeReleaseIndex {
    async fn latest_toolkit(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<Option<VersionTarget>, ReleaseIndexError> {
        self.listings
            .get(repo.as_str())
            .copied()
            .ok_or_else(|| ReleaseIndexError::Unreachable {
                repo: repo.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}

fn offline_index() -> Arc<FakeReleaseIndex> {
    Arc::new(FakeReleaseIndex {
        listings: HashMap::new(),
    })
}

fn request(os: OsProfile, choice: UserChoice) -> PlanRequest {
    PlanRequest {
        os,
        driver_ceiling: Some(v(12, 9)),
        current_installed: None,
        choice,
    }
}

#[tokio::test]
async fn latest_on_ubuntu_2404_falls_back_across_repo_and_version() {
    let index = Arc::new(FakeReleaseIndex {
        listings: HashMap::from([
            ("ubuntu2404".to_string(), None),
            ("ubuntu2204".to_string(), Some(v(12, 9))),
        ]),
    });
    let resolver = ResolverService::new(index, v(12, 9));
    let plan = resolver
        .plan(&request(OsProfile::ubuntu(24, 4), UserChoice::Latest))
        .await;

    assert_eq!(plan.status, PlanStatus::Install);
    assert_eq!(
        plan.target_source,
        Some(TargetSource::Repository(CudaRepoCandidate(
            "ubuntu2204".to_string()
        )))
    );

    let packages = Arc::new(
        FakePackageManager::default().with_repo("ubuntu2204", &["cuda-toolkit-12-3"]),
    );
    let outcome = PlanExecutor::new(packages.clone()).execute(&plan).await;

    assert_eq!(
        packages.calls(),
        vec![
            "configure ubuntu2404",
            "configure ubuntu2310",
            "configure ubuntu2304",
            "configure ubuntu2204",
            "install cuda-toolkit-12-9",
            "install cuda-toolkit-12-6",
            "install cuda-toolkit-12-3",
        ]
    );
    let point = outcome.ensure_succeeded(PackageArch::X86_64).unwrap();
    assert_eq!(point.repo.as_str(), "ubuntu2204");
    assert_eq!(point.entry, LadderEntry::Version(v(12, 3)));
    assert_eq!(outcome.final_version, Some(v(12, 3)));
}

#[tokio::test]
async fn exhausted_rhel_matrix_points_to_manual_install() {
    let resolver = ResolverService::new(offline_index(), v(12, 9));
    let plan = resolver
        .plan(&request(OsProfile::rhel(10, 0), UserChoice::Custom(v(12, 6))))
        .await;

    let packages = Arc::new(FakePackageManager::default().with_repo("rhel9", &[]));
    let outcome = PlanExecutor::new(packages).execute(&plan).await;

    // rhel10 fails to configure, rhel9 tries 12.6, 12.3, 12.2 and generic.
    assert_eq!(outcome.attempted.len(), 1 + 1 + 4);
    assert!(matches!(
        outcome.attempted[0].step,
        AttemptStep::ConfigureRepository
    ));
    match outcome.ensure_succeeded(PackageArch::X86_64) {
        Err(ProvisionError::ExhaustedAllCandidates {
            manual_install_url, ..
        }) => {
            assert!(manual_install_url.contains("Distribution=RHEL"));
            assert!(manual_install_url.contains("target_version=10"));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[tokio::test]
async fn generic_package_records_probed_version() {
    let resolver = ResolverService::new(offline_index(), v(12, 9));
    let plan = resolver
        .plan(&request(OsProfile::ubuntu(22, 4), UserChoice::Custom(v(11, 8))))
        .await;
    assert_eq!(
        plan.version_ladder,
        vec![LadderEntry::Version(v(11, 8)), LadderEntry::Generic]
    );

    let mut fake = FakePackageManager::default().with_repo("ubuntu2204", &["cuda-toolkit"]);
    fake.generic_version = Some(v(12, 8));
    let outcome = PlanExecutor::new(Arc::new(fake)).execute(&plan).await;

    assert_eq!(outcome.final_version, Some(v(12, 8)));
}

#[tokio::test]
async fn up_to_date_machine_needs_no_package_manager() {
    let resolver = ResolverService::new(offline_index(), v(12, 9));
    let mut req = request(OsProfile::ubuntu(24, 4), UserChoice::Latest);
    req.current_installed = Some(v(12, 9));

    let plan = resolver.plan(&req).await;
    assert_eq!(plan.status, PlanStatus::AlreadyUpToDate);
    assert_eq!(plan.target_source, Some(TargetSource::DefaultFallback));

    let packages = Arc::new(FakePackageManager::default());
    let outcome = PlanExecutor::new(packages.clone()).execute(&plan).await;
    assert!(outcome.attempted.is_empty());
    assert!(packages.calls().is_empty());
}

#[tokio::test]
async fn old_driver_warns_without_changing_the_ladder() {
    let resolver = ResolverService::new(offline_index(), v(12, 9));
    let mut req = request(OsProfile::ubuntu(24, 4), UserChoice::Custom(v(12, 9)));
    req.driver_ceiling = Some(v(12, 2));
    let warned = resolver.plan(&req).await;

    req.driver_ceiling = Some(v(13, 0));
    let clean = resolver.plan(&req).await;

    assert_eq!(warned.version_ladder, clean.version_ladder);
    assert!(clean.warnings.is_empty());
    assert_eq!(
        warned.warnings,
        vec![PlanWarning::DriverTooOld {
            requested: v(12, 9),
            driver_ceiling: v(12, 2),
        }]
    );
}

#[tokio::test]
async fn outcome_manifest_survives_reload() {
    let resolver = ResolverService::new(offline_index(), v(12, 9));
    let plan = resolver
        .plan(&request(OsProfile::ubuntu(24, 4), UserChoice::Custom(v(12, 6))))
        .await;
    let packages =
        Arc::new(FakePackageManager::default().with_repo("ubuntu2404", &["cuda-toolkit-12-6"]));
    let outcome = PlanExecutor::new(packages).execute(&plan).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("install-outcome.json");
    outcome.save(&path).unwrap();

    let loaded = InstallOutcome::load(&path).unwrap();
    assert_eq!(loaded, outcome);
    assert!(loaded.is_success());
}
