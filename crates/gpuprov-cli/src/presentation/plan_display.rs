//! Human-readable rendering of detection results, plans and outcomes.

use std::fmt::Write;

use gpuprov_core::{
    AttemptStep, EnvExport, GpuProbe, InstallOutcome, OsProfile, PlanStatus, ProvisioningPlan,
    TargetSource, VersionTarget,
};

use super::tables::{format_optional, row};

/// Detection report for `gpuprov detect`.
pub fn render_detection(
    gpu: Option<&GpuProbe>,
    os: &OsProfile,
    installed: Option<VersionTarget>,
    arch_export: Option<&EnvExport>,
) -> String {
    let mut out = String::new();
    match gpu {
        Some(probe) => {
            let _ = writeln!(out, "{}", row("GPU:", &probe.raw_name));
            let capability = probe.compute_capability().map_or_else(
                || "unknown".to_string(),
                |c| format!("{c} ({}, {})", c.family(), c.sm_name()),
            );
            let _ = writeln!(out, "{}", row("Compute:", capability));
            let _ = writeln!(
                out,
                "{}",
                row(
                    "Driver CUDA:",
                    format_optional(&probe.driver_cuda_version, "unknown")
                )
            );
        }
        None => {
            let _ = writeln!(out, "{}", row("GPU:", "none detected"));
        }
    }
    let _ = writeln!(out, "{}", row("OS:", os));
    let _ = writeln!(
        out,
        "{}",
        row("Toolkit:", format_optional(&installed, "not installed"))
    );
    if let Some(export) = arch_export {
        let _ = writeln!(out, "{}", row("Arch flag:", export.to_shell_line()));
    }
    out
}

/// Plan summary for `gpuprov plan` and the install confirmation.
pub fn render_plan(plan: &ProvisioningPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", row("OS:", plan.os));

    match plan.status {
        PlanStatus::Keep => {
            let _ = writeln!(out, "{}", row("Action:", "keep current toolkit"));
        }
        PlanStatus::AlreadyUpToDate => {
            let _ = writeln!(
                out,
                "{}",
                row(
                    "Action:",
                    format!(
                        "none, CUDA {} is already installed",
                        format_optional(&plan.target, "?")
                    )
                )
            );
        }
        PlanStatus::Install => {
            let source = match &plan.target_source {
                Some(TargetSource::Requested) => "requested".to_string(),
                Some(TargetSource::Repository(repo)) => format!("latest in {repo}"),
                Some(TargetSource::DefaultFallback) => "default, no repository answered".to_string(),
                None => "unknown".to_string(),
            };
            let _ = writeln!(
                out,
                "{}",
                row(
                    "Target:",
                    format!("CUDA {} ({source})", format_optional(&plan.target, "?"))
                )
            );
            let repos: Vec<&str> = plan.repo_candidates.iter().map(|r| r.as_str()).collect();
            let _ = writeln!(out, "{}", row("Repositories:", repos.join(", ")));
            let ladder: Vec<String> = plan
                .version_ladder
                .iter()
                .map(|entry| entry.package_name())
                .collect();
            let _ = writeln!(out, "{}", row("Packages:", ladder.join(", ")));
            let _ = writeln!(out, "{}", row("Max attempts:", plan.attempt_budget()));
        }
    }

    for warning in &plan.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}

/// Step-by-step listing of a recorded outcome.
pub fn render_outcome(outcome: &InstallOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        row("Recorded:", outcome.recorded_at.format("%Y-%m-%d %H:%M:%S UTC"))
    );
    let _ = writeln!(out, "{}", row("OS:", outcome.os));

    for (i, attempt) in outcome.attempted.iter().enumerate() {
        let step = match attempt.step {
            AttemptStep::ConfigureRepository => "configure repository".to_string(),
            AttemptStep::Install(entry) => format!("install {}", entry.package_name()),
        };
        let status = attempt
            .error
            .as_deref()
            .map_or_else(|| "ok".to_string(), |e| format!("failed: {e}"));
        let _ = writeln!(out, "{:>3}. [{}] {step}: {status}", i + 1, attempt.repo);
    }

    match &outcome.succeeded_at {
        Some(point) => {
            let _ = writeln!(
                out,
                "{}",
                row(
                    "Result:",
                    format!(
                        "installed {} from {} (step {})",
                        point.entry.package_name(),
                        point.repo,
                        point.attempt + 1
                    )
                )
            );
        }
        None if outcome.attempted.is_empty() => {
            let _ = writeln!(out, "{}", row("Result:", "nothing to do"));
        }
        None => {
            let _ = writeln!(out, "{}", row("Result:", "all candidates failed"));
        }
    }
    let _ = writeln!(
        out,
        "{}",
        row("Toolkit:", format_optional(&outcome.final_version, "unknown"))
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpuprov_core::{
        CudaRepoCandidate, LadderEntry, PlanRequest, SuccessPoint, UserChoice, build_plan,
    };

    #[test]
    fn test_render_install_plan() {
        let request = PlanRequest {
            os: OsProfile::ubuntu(24, 4),
            driver_ceiling: Some(VersionTarget::new(12, 4)),
            current_installed: None,
            choice: UserChoice::Custom(VersionTarget::new(12, 6)),
        };
        let plan = build_plan(
            &request,
            Some((VersionTarget::new(12, 6), TargetSource::Requested)),
        );
        let text = render_plan(&plan);

        assert!(text.contains("CUDA 12.6 (requested)"));
        assert!(text.contains("ubuntu2404, ubuntu2310"));
        assert!(text.contains("cuda-toolkit-12-6, cuda-toolkit-12-3"));
        assert!(text.contains("warning: CUDA 12.6 is newer than the driver"));
    }

    #[test]
    fn test_render_keep_plan() {
        let request = PlanRequest {
            os: OsProfile::rhel(9, 4),
            driver_ceiling: Some(VersionTarget::new(12, 9)),
            current_installed: Some(VersionTarget::new(12, 4)),
            choice: UserChoice::Keep,
        };
        let text = render_plan(&build_plan(&request, None));
        assert!(text.contains("keep current toolkit"));
        assert!(!text.contains("Packages:"));
    }

    #[test]
    fn test_render_outcome_lists_attempts() {
        let repo = CudaRepoCandidate("ubuntu2404".to_string());
        let mut outcome = InstallOutcome::new(OsProfile::ubuntu(24, 4));
        outcome.record(&repo, AttemptStep::ConfigureRepository, None);
        outcome.record(
            &repo,
            AttemptStep::Install(LadderEntry::Version(VersionTarget::new(12, 9))),
            Some("not found".to_string()),
        );

        let text = render_outcome(&outcome);
        assert!(text.contains("1. [ubuntu2404] configure repository: ok"));
        assert!(text.contains("2. [ubuntu2404] install cuda-toolkit-12-9: failed: not found"));
        assert!(text.contains("all candidates failed"));
    }

    #[test]
    fn test_render_outcome_names_successful_step() {
        let repo = CudaRepoCandidate("rhel9".to_string());
        let entry = LadderEntry::Version(VersionTarget::new(12, 6));
        let mut outcome = InstallOutcome::new(OsProfile::rhel(9, 4));
        outcome.record(&repo, AttemptStep::ConfigureRepository, None);
        outcome.record(&repo, AttemptStep::Install(entry), None);
        outcome.succeeded_at = Some(SuccessPoint {
            attempt: 1,
            repo,
            entry,
        });

        let text = render_outcome(&outcome);
        assert!(text.contains("installed cuda-toolkit-12-6 from rhel9 (step 2)"));
    }
}
