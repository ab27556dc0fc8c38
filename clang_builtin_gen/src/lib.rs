pub mod cli;

pub use clang_builtin_gen_core::{config, declaration, emit, generator, registry, typecode, wrapper};

use clang_builtin_gen_core::{
    GenError, GenerationReport, GeneratorConfig, HeaderGenerator, LicenseScript,
    NoopPostProcessor, PostProcessor, Result, config::resolve_root,
};
use cli::Cli;
use tracing::{debug, info};

/// Runs one generation pass for the parsed command line.
pub fn run(cli: &Cli) -> Result<GenerationReport> {
    let input = cli.input.as_ref().ok_or(GenError::MissingInput)?;

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_toml_path(path)?,
        None => GeneratorConfig::default(),
    };
    config.root = resolve_root(cli.chpl_home.clone())?;
    debug!("Installation root: {:?}", config.root);

    let hook: Box<dyn PostProcessor> = if cli.no_license {
        info!("License stamping disabled");
        Box::new(NoopPostProcessor)
    } else {
        Box::new(LicenseScript::under_root(&config.root))
    };

    HeaderGenerator::new(config).generate_from_file(input, hook.as_ref())
}
