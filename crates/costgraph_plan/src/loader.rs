//! Plan loading from JSON files or Terraform projects.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{PlanError, PlanResult};
use crate::parser::{parse_plan, ParsedPlan};

/// Where a plan comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    /// Output of `terraform show -json`.
    JsonFile(PathBuf),
    /// A binary plan saved with `terraform plan -out`.
    PlanFile(PathBuf),
    /// A Terraform project directory.
    Directory(PathBuf),
}

impl PlanSource {
    /// Detect the source type of a path.
    pub fn detect(path: &Path) -> PlanResult<Self> {
        let metadata = std::fs::metadata(path)?;

        if metadata.is_dir() {
            if has_tf_files(path) {
                return Ok(Self::Directory(path.to_path_buf()));
            }
            return Err(PlanError::UnsupportedPath(path.display().to_string()));
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::JsonFile(path.to_path_buf())),
            _ => Ok(Self::PlanFile(path.to_path_buf())),
        }
    }

    /// Short name recorded in project metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JsonFile(_) => "terraform_plan_json",
            Self::PlanFile(_) => "terraform_plan",
            Self::Directory(_) => "terraform_dir",
        }
    }
}

fn has_tf_files(dir: &Path) -> bool {
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("*.tf");
    glob::glob(&pattern.to_string_lossy())
        .map(|mut paths| paths.any(|p| p.is_ok()))
        .unwrap_or(false)
}

/// Runs the Terraform CLI as a subprocess.
#[derive(Debug, Clone)]
pub struct TerraformRunner {
    binary: String,
    plan_flags: Vec<String>,
}

impl TerraformRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            plan_flags: Vec::new(),
        }
    }

    /// Extra flags for `terraform plan`, split on whitespace.
    pub fn with_plan_flags(mut self, flags: &str) -> Self {
        self.plan_flags = flags.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub async fn init(&self, working_dir: &Path) -> PlanResult<Vec<u8>> {
        info!("Running terraform init in {:?}", working_dir);
        self.run_command(working_dir, &["init", "-input=false", "-no-color"]).await
    }

    pub async fn plan(&self, working_dir: &Path, out: &Path) -> PlanResult<Vec<u8>> {
        info!("Running terraform plan in {:?}", working_dir);
        let mut args: Vec<String> = ["plan", "-input=false", "-lock=false", "-no-color"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(self.plan_flags.iter().cloned());
        args.push(format!("-out={}", out.display()));

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_command(working_dir, &args).await
    }

    pub async fn show_json(&self, working_dir: &Path, plan_file: &Path) -> PlanResult<Vec<u8>> {
        info!("Running terraform show for {:?}", plan_file);
        let plan_file = plan_file.to_string_lossy();
        self.run_command(working_dir, &["show", "-no-color", "-json", &*plan_file]).await
    }

    async fn run_command(&self, working_dir: &Path, args: &[&str]) -> PlanResult<Vec<u8>> {
        debug!("Executing {} {:?}", self.binary, args);

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(working_dir)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => PlanError::TerraformNotFound(self.binary.clone()),
                _ => PlanError::Io(e),
            })?;

        if !output.status.success() {
            return Err(PlanError::Terraform {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: strip_blank_lines(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        Ok(output.stdout)
    }
}

impl Default for TerraformRunner {
    fn default() -> Self {
        Self::new("terraform")
    }
}

fn strip_blank_lines(s: &str) -> String {
    s.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Produces plan JSON for a path, invoking Terraform when needed.
#[derive(Debug, Clone, Default)]
pub struct PlanLoader {
    runner: TerraformRunner,
}

impl PlanLoader {
    pub fn new(runner: TerraformRunner) -> Self {
        Self { runner }
    }

    /// Read or generate the plan JSON for a source.
    pub async fn load_json(&self, source: &PlanSource) -> PlanResult<Vec<u8>> {
        match source {
            PlanSource::JsonFile(path) => {
                debug!("Reading plan JSON {:?}", path);
                Ok(tokio::fs::read(path).await?)
            }
            PlanSource::PlanFile(path) => {
                let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
                let file = path.file_name().map(Path::new).unwrap_or(path.as_path());
                self.runner.show_json(dir, file).await
            }
            PlanSource::Directory(dir) => {
                if !dir.join(".terraform").exists() {
                    self.runner.init(dir).await?;
                }

                let plan_file = tempfile::Builder::new().prefix("tfplan").tempfile()?;
                self.runner.plan(dir, plan_file.path()).await?;
                self.runner.show_json(dir, plan_file.path()).await
            }
        }
    }

    /// Load and parse the plan at `path`.
    pub async fn load(&self, path: &Path) -> PlanResult<ParsedPlan> {
        let source = PlanSource::detect(path)?;
        let json = self.load_json(&source).await?;
        parse_plan(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_sources() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("plan.json");
        fs::write(&json, "{}").unwrap();
        let binary = dir.path().join("plan.tfplan");
        fs::write(&binary, "").unwrap();

        assert_eq!(PlanSource::detect(&json).unwrap(), PlanSource::JsonFile(json.clone()));
        assert_eq!(PlanSource::detect(&binary).unwrap(), PlanSource::PlanFile(binary.clone()));
        assert!(matches!(
            PlanSource::detect(dir.path()),
            Err(PlanError::UnsupportedPath(_))
        ));

        fs::write(dir.path().join("main.tf"), "").unwrap();
        assert_eq!(
            PlanSource::detect(dir.path()).unwrap(),
            PlanSource::Directory(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_detect_directory_with_glob_characters() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("env[prod]*");
        fs::create_dir(&module).unwrap();
        fs::write(module.join("main.tf"), "").unwrap();

        assert_eq!(PlanSource::detect(&module).unwrap(), PlanSource::Directory(module.clone()));
    }

    #[test]
    fn test_detect_missing_path() {
        assert!(matches!(
            PlanSource::detect(Path::new("/nonexistent/costgraph/plan.json")),
            Err(PlanError::Io(_))
        ));
    }

    #[test]
    fn test_plan_flags_split() {
        let runner = TerraformRunner::default().with_plan_flags("-var-file=prod.tfvars  -refresh=false");
        assert_eq!(runner.plan_flags, vec!["-var-file=prod.tfvars", "-refresh=false"]);
        assert_eq!(runner.binary(), "terraform");
    }

    #[test]
    fn test_strip_blank_lines() {
        assert_eq!(strip_blank_lines("\nError: x\n\n  \n  detail  \n"), "Error: x\n  detail");
    }

    #[tokio::test]
    async fn test_missing_terraform_binary() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();

        let loader = PlanLoader::new(TerraformRunner::new("costgraph-no-such-terraform"));
        let err = loader.load(dir.path()).await.unwrap_err();
        assert!(matches!(err, PlanError::TerraformNotFound(ref b) if b == "costgraph-no-such-terraform"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_show_saved_plan_in_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let plans = dir.path().join("plans");
        fs::create_dir(&plans).unwrap();
        fs::write(plans.join("x.tfplan"), "").unwrap();

        // Fails unless the plan argument exists relative to the working directory.
        let script = dir.path().join("fake-terraform");
        fs::write(
            &script,
            "#!/bin/sh\n[ -f \"$4\" ] || { echo \"no such file: $PWD/$4\" >&2; exit 1; }\necho \"{\\\"plan\\\": \\\"$4\\\"}\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let loader = PlanLoader::new(TerraformRunner::new(script.to_string_lossy()));
        let json = loader
            .load_json(&PlanSource::PlanFile(plans.join("x.tfplan")))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["plan"], "x.tfplan");
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(
            &path,
            r#"{"planned_values": {"root_module": {"resources": [
                {"address": "aws_eip.ip", "type": "aws_eip", "provider_name": "aws", "values": {}}
            ]}}}"#,
        )
        .unwrap();

        let plan = PlanLoader::default().load(&path).await.unwrap();
        assert!(plan.current.contains("aws_eip.ip"));
    }
}
