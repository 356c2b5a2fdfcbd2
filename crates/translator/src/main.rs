use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use vta::config::CompileConfig;

#[derive(Parser)]
#[command(name = "vtac", about = "Translate, build, and run VTA programs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a .vta file to C++ only.
    Translate {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "")]
        stdin: String,
    },
    /// Translate and compile with the system C++ compiler.
    Build {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "")]
        stdin: String,
        #[arg(long, default_value = "g++")]
        cxx: String,
        #[arg(long, default_value_t = 50_000)]
        template_depth: u32,
        #[arg(long)]
        keep_cpp: bool,
    },
    /// Translate, build, and run, forwarding stdout.
    Run {
        input: PathBuf,
        #[arg(long, default_value = "")]
        stdin: String,
        #[arg(long, default_value = "g++")]
        cxx: String,
        #[arg(long, default_value_t = 50_000)]
        template_depth: u32,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Translate { input, output, stdin } => {
            let source = std::fs::read_to_string(&input)?;
            let cpp = vta::translate(&source, &stdin)?;
            match output {
                Some(path) => std::fs::write(path, cpp)?,
                None => print!("{cpp}"),
            }
            Ok(())
        }
        Commands::Build {
            input,
            output,
            stdin,
            cxx,
            template_depth,
            keep_cpp,
        } => {
            let source = std::fs::read_to_string(&input)?;
            let workdir = std::env::temp_dir();
            let name = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("vta_program");
            let cpp_path = workdir.join(format!("{name}.cpp"));
            let binary_path = output.unwrap_or_else(|| PathBuf::from(name));
            let config = CompileConfig::new()
                .with_cxx(cxx)
                .with_template_depth(template_depth)
                .with_keep_cpp(keep_cpp);
            vta::translate_to_file(&source, &stdin, &cpp_path)?;
            vta::compile(&cpp_path, &binary_path, &config)?;
            tracing::info!(?binary_path, "build complete");
            Ok(())
        }
        Commands::Run {
            input,
            stdin,
            cxx,
            template_depth,
        } => {
            let source = std::fs::read_to_string(&input)?;
            let workdir = std::env::temp_dir();
            let name = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("vta_program");
            let config = CompileConfig::new().with_cxx(cxx).with_template_depth(template_depth);
            let stdout = vta::translate_compile_run(&source, &stdin, &workdir, name, &config)?;
            print!("{stdout}");
            Ok(())
        }
    }
}
