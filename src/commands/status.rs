use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::App;
use crate::ops::git::GitOps;
use crate::status::StatusEntry;

#[derive(Serialize)]
struct StatusJson<'a> {
    branch: &'a str,
    remote: &'a str,
    clean: bool,
    entries: &'a [StatusEntry],
}

impl<G: GitOps> App<G> {
    /// Show what a sync would commit, without touching the repository.
    pub async fn cmd_status(&self, json: bool, stdout: &mut impl std::io::Write) -> Result<()> {
        // Fallback diagnostics go to a sink so JSON output stays parseable
        let branch = if json {
            self.resolve_branch(&mut std::io::sink()).await
        } else {
            self.resolve_branch(stdout).await
        };
        let status = self.check_status().await?;

        if json {
            let out = StatusJson {
                branch: &branch,
                remote: &self.config.remote,
                clean: status.is_clean(),
                entries: &status.entries,
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&out)?)?;
            return Ok(());
        }

        writeln!(
            stdout,
            "📌 {} -> {}/{}",
            branch, self.config.remote, branch
        )?;
        if status.is_clean() {
            writeln!(stdout, "{}", "✅ Working tree clean".green())?;
            return Ok(());
        }

        writeln!(stdout, "📋 {} file(s) changed", status.len())?;
        for entry in &status.entries {
            let kind = format!("{:>10}", entry.kind());
            let kind = if entry.is_untracked() {
                kind.dimmed()
            } else {
                kind.yellow()
            };
            match &entry.original_path {
                Some(from) => writeln!(stdout, "{} {} -> {}", kind, from, entry.path)?,
                None => writeln!(stdout, "{} {}", kind, entry.path)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::App;
    use crate::config::Config;
    use crate::ops::git::MockGitOps;

    fn git_with_status(porcelain: &'static str) -> MockGitOps {
        let mut git = MockGitOps::new();
        git.expect_current_branch()
            .returning(|| Ok("main".to_string()));
        git.expect_status_porcelain()
            .returning(move || Ok(porcelain.to_string()));
        git.expect_stage_all().never();
        git.expect_commit().never();
        git.expect_pull_rebase().never();
        git.expect_push().never();
        git
    }

    #[tokio::test]
    async fn test_status_lists_entries() {
        let app = App::new(
            Config::default_for_tests(),
            git_with_status(" M src/lib.rs\nR  old.rs -> new.rs\n?? a.txt"),
        );
        let mut out = Vec::new();
        app.cmd_status(false, &mut out).await.unwrap();

        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        📌 main -> origin/main
        📋 3 file(s) changed
          modified src/lib.rs
           renamed old.rs -> new.rs
         untracked a.txt
        ");
    }

    #[tokio::test]
    async fn test_status_clean() {
        let app = App::new(Config::default_for_tests(), git_with_status(""));
        let mut out = Vec::new();
        app.cmd_status(false, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("✅ Working tree clean"));
    }

    #[tokio::test]
    async fn test_status_json() {
        let app = App::new(Config::default_for_tests(), git_with_status("?? a.txt"));
        let mut out = Vec::new();
        app.cmd_status(true, &mut out).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["branch"], "main");
        assert_eq!(value["remote"], "origin");
        assert_eq!(value["clean"], false);
        assert_eq!(value["entries"][0]["path"], "a.txt");
        assert_eq!(value["entries"][0]["index"], "?");
    }
}
