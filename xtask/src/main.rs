// Kwanqa Tutor - Build Task Runner
// Unified build system using cargo xtask pattern

use anyhow::{Context, Result};
use xshell::{cmd, Shell};

const BINARY: &str = "kwanqa-tutor";

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => {
            let release = args.contains(&"--release".to_string());
            let skip_site = args.contains(&"--skip-site".to_string());
            build(&sh, release, skip_site)
        }
        Some("test") => test(&sh),
        Some("format") => {
            let check = args.contains(&"--check".to_string());
            format(&sh, check)
        }
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Kwanqa Tutor - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release] [--skip-site]   Export the static site and build the backend");
    println!("  test                              Run all backend tests");
    println!("  format [--check]                  Format Rust code");
    println!("  clippy                            Run clippy checks");
    println!("  run [ARGS...]                     Run the backend (debug build)");
    println!("  clean                             Clean build artifacts");
    println!("  ci                                Run format check + clippy + test");
    println!("  dist                              Create distribution package (tar.gz)");
    println!();
    println!("Examples:");
    println!("  cargo xtask build --release");
    println!("  cargo xtask run -- --port 3001");
}

/// Export the static site (if present) and build the backend
fn build(sh: &Shell, release: bool, skip_site: bool) -> Result<()> {
    println!("🔨 Building Kwanqa Tutor...");
    println!();

    let site_dir = project_root().join("web");
    if skip_site || !site_dir.join("package.json").exists() {
        println!("⏭️  [1/2] Skipping static site export");
    } else {
        println!("📦 [1/2] Exporting static site...");
        build_site(sh)?;
        println!("✅ Static site exported to web/out");
    }
    println!();

    println!("🦀 [2/2] Building backend{}...", if release { " (release)" } else { "" });
    if release {
        cmd!(sh, "cargo build --release -p kwanqa-tutor")
            .run()
            .context("Failed to build backend in release mode")?;
    } else {
        cmd!(sh, "cargo build -p kwanqa-tutor").run().context("Failed to build backend")?;
    }
    println!("✅ Backend build complete");

    Ok(())
}

/// Export the Next.js site to static files
fn build_site(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root().join("web"));

    cmd!(sh, "npm install").run().context("Failed to install site dependencies")?;
    cmd!(sh, "npm run build").run().context("Failed to export static site")?;

    Ok(())
}

/// Run all tests
fn test(sh: &Shell) -> Result<()> {
    println!("🧪 Running tests...");
    println!();

    let _dir = sh.push_dir(project_root());
    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!();
    println!("✅ All tests passed!");

    Ok(())
}

/// Format code
fn format(sh: &Shell, check: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    if check {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all").run().context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

/// Run clippy checks
fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    cmd!(sh, "cargo clippy --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

/// Run the backend with the given arguments
fn run(sh: &Shell, args: &[String]) -> Result<()> {
    println!("▶️  Starting Kwanqa Tutor...");
    println!();

    let _dir = sh.push_dir(project_root());

    let mut cmd = cmd!(sh, "cargo run -p kwanqa-tutor --");
    for arg in args {
        cmd = cmd.arg(arg);
    }

    cmd.run().context("Failed to run application")?;

    Ok(())
}

/// Clean build artifacts
fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 Cleaning build artifacts...");

    let project = project_root();
    let _dir = sh.push_dir(&project);
    cmd!(sh, "cargo clean").run()?;

    for dir in [project.join("build"), project.join("web/out"), project.join("web/.next")] {
        if dir.exists() {
            cmd!(sh, "rm -rf {dir}").run()?;
        }
    }

    println!("✅ Clean complete!");

    Ok(())
}

/// Run all CI checks (format + clippy + test)
fn ci(sh: &Shell) -> Result<()> {
    println!("🔄 Running CI pipeline...");
    println!();

    println!("📝 [1/3] Checking code format...");
    format(sh, true)?;
    println!();

    println!("🔍 [2/3] Running clippy checks...");
    clippy(sh)?;
    println!("✅ Clippy checks passed");
    println!();

    println!("🧪 [3/3] Running tests...");
    test(sh)?;
    println!();

    println!("🎉 CI pipeline completed successfully!");

    Ok(())
}

/// Create distribution package (tar.gz)
fn dist(sh: &Shell) -> Result<()> {
    build(sh, true, false)?;
    println!();

    let project = project_root();
    let dist_dir = project.join("build/dist");

    cmd!(sh, "mkdir -p {dist_dir}/bin {dist_dir}/conf {dist_dir}/logs {dist_dir}/web").run()?;

    let binary_src = project.join(format!("target/release/{BINARY}"));
    let binary_dst = dist_dir.join(format!("bin/{BINARY}"));
    cmd!(sh, "cp {binary_src} {binary_dst}").run()?;

    let site_out = project.join("web/out");
    let web_dst = dist_dir.join("web");
    if site_out.exists() {
        cmd!(sh, "cp -r {site_out}/. {web_dst}/").run()?;
    }

    let config_src = project.join("backend/conf/config.toml");
    let config_dst = dist_dir.join("conf/config.toml");
    cmd!(sh, "cp {config_src} {config_dst}").run()?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("{BINARY}-{timestamp}.tar.gz");
    let package_path = dist_dir.join(&package_name);

    println!("📋 Creating tarball: {}...", package_name);
    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs web")
        .run()
        .context("Failed to create tarball")?;

    println!();
    println!("✅ Distribution package created!");
    println!("   Location: {}", package_path.display());

    Ok(())
}

/// Get project root directory
fn project_root() -> std::path::PathBuf {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
}
