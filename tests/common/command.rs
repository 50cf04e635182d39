use crate::common::file::{FileSpec, write_file, write_generated_files};
use crate::common::{APP_JS, NOT_UTF8, README_V1, README_V2, SPACED};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

const GIT_ENV: [(&str, &str); 8] = [
    ("GIT_AUTHOR_NAME", "fake_user"),
    ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
    ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"),
    ("GIT_COMMITTER_NAME", "fake_user"),
    ("GIT_COMMITTER_EMAIL", "fake_email@email.com"),
    ("GIT_COMMITTER_DATE", "2023-01-01 12:00:00 +0000"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
];

/// Repository built by [`sample_repository`]
///
/// History:
/// - first commit: `README.md` (v1), `assets/`, `src/`; annotated tag
///   `v1.0.0`, lightweight tag `light`, branches `release` and `feature`
/// - second commit, tip of `main`: `README.md` (v2), `docs/`, `binary.bin`,
///   executable `run.sh`, symlink `link`, submodule `vendor`; lightweight tag
///   `feature` (shadowed by the branch) and annotated tag `treetag` on the
///   root tree
#[derive(Debug)]
pub struct SampleRepository {
    pub dir: TempDir,
    pub first_commit: String,
    pub second_commit: String,
    pub v1_tag_object: String,
    pub second_tree: String,
}

impl SampleRepository {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn sample_repository(repository_dir: TempDir) -> SampleRepository {
    let root = repository_dir.path();

    git(root, &["init", "--quiet"]);
    git(root, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    write_file(&FileSpec::text(root.join("README.md"), README_V1));
    write_file(&FileSpec::text(root.join("assets").join("app.js"), APP_JS));
    write_file(&FileSpec::text(
        root.join("assets").join("unknownext.xyz"),
        "opaque\n",
    ));
    write_generated_files(&root.join("src"), 3);

    git(root, &["add", "."]);
    git(root, &["commit", "--quiet", "-m", "First commit"]);
    let first_commit = git(root, &["rev-parse", "HEAD"]);

    git(root, &["tag", "-a", "v1.0.0", "-m", "Release 1.0.0"]);
    git(root, &["tag", "light"]);
    git(root, &["branch", "release"]);
    git(root, &["branch", "feature"]);

    write_file(&FileSpec::text(root.join("README.md"), README_V2));
    write_file(&FileSpec::text(root.join("docs").join("guide.md"), "guide\n"));
    write_file(&FileSpec::text(
        root.join("docs").join("hello world.txt"),
        SPACED,
    ));
    write_file(&FileSpec::new(root.join("binary.bin"), NOT_UTF8.to_vec()));
    write_file(&FileSpec::text(root.join("run.sh"), "#!/bin/sh\necho hi\n"));

    git(root, &["add", "."]);
    git(root, &["update-index", "--chmod=+x", "run.sh"]);

    let link_target = run_git_command(root, &["hash-object", "-w", "--stdin"])
        .write_stdin("README.md")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let link_target = String::from_utf8(link_target).expect("git output is not UTF-8");
    git(
        root,
        &[
            "update-index",
            "--add",
            "--cacheinfo",
            &format!("120000,{},link", link_target.trim()),
        ],
    );
    git(
        root,
        &[
            "update-index",
            "--add",
            "--cacheinfo",
            &format!("160000,{first_commit},vendor"),
        ],
    );

    git(root, &["commit", "--quiet", "-m", "Second commit"]);
    let second_commit = git(root, &["rev-parse", "HEAD"]);
    let second_tree = git(root, &["rev-parse", "HEAD^{tree}"]);

    git(root, &["tag", "feature"]);
    git(root, &["tag", "-a", "treetag", "-m", "Tag on a tree", &second_tree]);
    let v1_tag_object = git(root, &["rev-parse", "v1.0.0"]);

    SampleRepository {
        dir: repository_dir,
        first_commit,
        second_commit,
        v1_tag_object,
        second_tree,
    }
}

/// [`sample_repository`] after `git gc`: every object lives in a pack and every
/// ref in `packed-refs`
#[fixture]
pub fn packed_repository(sample_repository: SampleRepository) -> SampleRepository {
    let root = sample_repository.path();
    git(root, &["gc", "--quiet"]);

    let objects = root.join(".git").join("objects");
    let commit = &sample_repository.second_commit;
    assert!(!objects.join(&commit[..2]).join(&commit[2..]).exists());
    assert!(!root.join(".git").join("refs").join("heads").join("main").exists());

    sample_repository
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.envs(GIT_ENV);
    cmd.args([
        "-c",
        "commit.gpgsign=false",
        "-c",
        "tag.gpgsign=false",
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Run git, assert success and return its trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = run_git_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output)
        .expect("git output is not UTF-8")
        .trim()
        .to_string()
}

/// Raw bytes of the blob at `path` in `revision`
pub fn git_show_bytes(dir: &Path, revision: &str, path: &str) -> Vec<u8> {
    run_git_command(dir, &["cat-file", "blob", &format!("{revision}:{path}")])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone()
}

/// Names in the tree at `path` (root when empty), in git's order
pub fn git_ls_tree_names(dir: &Path, revision: &str, path: &str) -> Vec<String> {
    let treeish = if path.is_empty() {
        revision.to_string()
    } else {
        format!("{revision}:{path}")
    };

    git(dir, &["ls-tree", "--name-only", &treeish])
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn run_revserve_command(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("revserve").expect("Failed to find revserve binary");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
