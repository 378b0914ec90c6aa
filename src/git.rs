//! Changed-file discovery through libgit2.
//!
//! Thin wrapper around `git2::Repository`. A fresh `Repository` handle is
//! opened per operation so the wrapper stays `Send`-friendly; path handling
//! and diffing stay inside libgit2 instead of shelling out to the git CLI.

use crate::config::ResolvedFileFilter;
use crate::errors::CovgateError;
use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffOptions, Repository};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo_path: PathBuf,
}

impl GitRepo {
    /// Open a repository, discovering the root from any subdirectory.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| CovgateError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let repo_path = repo
            .workdir()
            .ok_or_else(|| anyhow::anyhow!("bare repositories are not supported"))?
            .to_path_buf();

        Ok(Self { repo_path })
    }

    /// The repository working-tree root.
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn open_repo(&self) -> Result<Repository> {
        Repository::open(&self.repo_path)
            .with_context(|| format!("failed to open repository at {}", self.repo_path.display()))
    }

    /// Current branch shorthand, or "HEAD" when detached.
    pub fn current_branch(&self) -> Result<String> {
        let repo = self.open_repo()?;
        let head = repo.head().context("failed to read HEAD")?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    /// Full object id of the current HEAD commit.
    pub fn head_commit(&self) -> Result<String> {
        let repo = self.open_repo()?;
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .context("failed to resolve HEAD commit")?;
        Ok(commit.id().to_string())
    }

    /// Files staged in the index relative to HEAD (pre-commit scenario).
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let repo = self.open_repo()?;
        // An unborn HEAD (fresh repository) diffs against an empty tree.
        let head_tree = match repo.head() {
            Ok(head) => Some(head.peel_to_tree().context("failed to peel HEAD to a tree")?),
            Err(_) => None,
        };
        let index = repo.index().context("failed to read the index")?;
        let diff = repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut diff_options()))
            .context("failed to diff HEAD against the index")?;
        Ok(collect_changed_paths(&diff))
    }

    /// Files touched by a single commit (vs its first parent, or the whole
    /// tree for a root commit).
    pub fn commit_files(&self, rev: &str) -> Result<Vec<String>> {
        let repo = self.open_repo()?;
        let commit = repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .with_context(|| format!("failed to resolve commit {rev}"))?;
        let tree = commit.tree().context("failed to read commit tree")?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree().context("failed to read parent tree")?),
            Err(_) => None,
        };
        let diff = repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_options()))
            .with_context(|| format!("failed to diff commit {rev}"))?;
        Ok(collect_changed_paths(&diff))
    }

    /// Files changed on the current branch relative to `base` — the
    /// accumulated diff of a pull request. Diffs from the merge base, so
    /// commits landing on `base` after the branch point are not counted.
    pub fn files_against(&self, base: &str) -> Result<Vec<String>> {
        let repo = self.open_repo()?;
        let head = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .context("failed to resolve HEAD commit")?;
        let base_commit = resolve_base(&repo, base)?;
        let merge_base = repo
            .merge_base(base_commit.id(), head.id())
            .with_context(|| format!("no merge base between {base} and HEAD"))?;
        let base_tree = repo
            .find_commit(merge_base)
            .and_then(|commit| commit.tree())
            .context("failed to read merge-base tree")?;
        let head_tree = head.tree().context("failed to read HEAD tree")?;
        let diff = repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut diff_options()))
            .with_context(|| format!("failed to diff against {base}"))?;
        Ok(collect_changed_paths(&diff))
    }
}

/// The remote-tracking ref is preferred so CI checkouts with a stale or
/// missing local base branch still resolve.
fn resolve_base<'r>(repo: &'r Repository, base: &str) -> Result<git2::Commit<'r>> {
    for candidate in [format!("origin/{base}"), base.to_string()] {
        if let Ok(commit) = repo
            .revparse_single(&candidate)
            .and_then(|object| object.peel_to_commit())
        {
            return Ok(commit);
        }
    }
    anyhow::bail!("base branch {base} not found (tried origin/{base} and {base})")
}

fn diff_options() -> DiffOptions {
    let mut options = DiffOptions::new();
    options.ignore_submodules(true);
    options
}

/// Keep Added, Copied, Modified, and Renamed deltas; deleted files have no
/// coverage to measure.
fn collect_changed_paths(diff: &Diff) -> Vec<String> {
    diff.deltas()
        .filter(|delta| {
            matches!(
                delta.status(),
                Delta::Added | Delta::Copied | Delta::Modified | Delta::Renamed
            )
        })
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .map(|path| path.to_string_lossy().into_owned())
        })
        .collect()
}

/// Drop empty entries and apply the configured file filter.
pub fn filter_files(files: Vec<String>, filter: &ResolvedFileFilter) -> Vec<String> {
    files
        .into_iter()
        .filter(|file| !file.is_empty() && filter.matches(file))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::fs;
    use tempfile::TempDir;

    fn signature() -> Signature<'static> {
        Signature::now("covgate", "covgate@example.com").expect("signature")
    }

    fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
        let mut index = repo.index().expect("index");
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .expect("add all");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let sig = signature();
        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write file");
    }

    #[test]
    fn discover_rejects_plain_directories() {
        let dir = TempDir::new().expect("tempdir");
        assert!(GitRepo::discover(dir.path()).is_err());
    }

    #[test]
    fn commit_files_reports_the_commit_delta() {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");

        write(dir.path(), "src/a.rs", "fn a() {}\n");
        commit_all(&repo, "initial");

        write(dir.path(), "src/b.rs", "fn b() {}\n");
        write(dir.path(), "src/a.rs", "fn a() { let _ = 1; }\n");
        commit_all(&repo, "second");

        let git = GitRepo::discover(dir.path()).expect("discover");
        let mut files = git.commit_files("HEAD").expect("commit files");
        files.sort();
        assert_eq!(files, vec!["src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn root_commit_reports_its_whole_tree() {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");

        write(dir.path(), "src/a.rs", "fn a() {}\n");
        commit_all(&repo, "initial");

        let git = GitRepo::discover(dir.path()).expect("discover");
        let files = git.commit_files("HEAD").expect("commit files");
        assert_eq!(files, vec!["src/a.rs"]);
    }

    #[test]
    fn staged_files_sees_the_index_only() {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");

        write(dir.path(), "src/a.rs", "fn a() {}\n");
        commit_all(&repo, "initial");

        write(dir.path(), "src/staged.rs", "fn staged() {}\n");
        let mut index = repo.index().expect("index");
        index
            .add_path(Path::new("src/staged.rs"))
            .expect("add path");
        index.write().expect("write index");

        // Untracked and unstaged files do not appear.
        write(dir.path(), "src/untracked.rs", "fn untracked() {}\n");

        let git = GitRepo::discover(dir.path()).expect("discover");
        let files = git.staged_files().expect("staged files");
        assert_eq!(files, vec!["src/staged.rs"]);
    }

    #[test]
    fn files_against_base_accumulates_branch_commits() {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");

        write(dir.path(), "src/a.rs", "fn a() {}\n");
        let base_oid = commit_all(&repo, "initial");
        repo.branch(
            "base",
            &repo.find_commit(base_oid).expect("base commit"),
            false,
        )
        .expect("branch");

        write(dir.path(), "src/feature1.rs", "fn f1() {}\n");
        commit_all(&repo, "feature 1");
        write(dir.path(), "src/feature2.rs", "fn f2() {}\n");
        commit_all(&repo, "feature 2");

        let git = GitRepo::discover(dir.path()).expect("discover");
        let mut files = git.files_against("base").expect("files against base");
        files.sort();
        assert_eq!(files, vec!["src/feature1.rs", "src/feature2.rs"]);
    }

    #[test]
    fn missing_base_branch_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");
        write(dir.path(), "src/a.rs", "fn a() {}\n");
        commit_all(&repo, "initial");

        let git = GitRepo::discover(dir.path()).expect("discover");
        assert!(git.files_against("does-not-exist").is_err());
    }

    #[test]
    fn filter_files_applies_the_resolved_filter() {
        let filter = crate::config::resolve_config(&Default::default(), None)
            .expect("resolves")
            .file_filter;

        let files = vec![
            "src/kept.rs".to_string(),
            "src/skipped.md".to_string(),
            "".to_string(),
            "docs/outside.rs".to_string(),
        ];
        assert_eq!(filter_files(files, &filter), vec!["src/kept.rs"]);
    }
}
