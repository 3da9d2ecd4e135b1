use anyhow::{bail, Context, Result};
use codonbias::config::{ConfigManager, PrecisionMethod};
use codonbias::engines::generation::GeneInitializer;
use codonbias::types::ChoiceVector;
use std::env;

fn parse_choices(arg: &str) -> Result<ChoiceVector> {
    let counts = arg
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .with_context(|| format!("invalid choice count '{}'", s))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ChoiceVector::from_counts(counts)?)
}

fn main() -> Result<()> {
    env_logger::init();

    // Usage: codonbias <choice counts, e.g. 1,2,3,5> [config.toml]
    let args: Vec<String> = env::args().collect();
    let Some(choices_arg) = args.get(1) else {
        bail!("usage: codonbias <choice counts, e.g. 1,2,3,5> [config file]");
    };
    let choices = parse_choices(choices_arg)?;

    let manager = match args.get(2) {
        Some(path) => ConfigManager::load_from_file(path)
            .with_context(|| format!("loading {}", path))?,
        None => ConfigManager::new(),
    };
    let config = manager.get();
    let threshold = config.decoding.bias_threshold;

    eprintln!("Choice counts: {:?}", choices.iter().collect::<Vec<_>>());
    for method in [PrecisionMethod::Min, PrecisionMethod::Lcm, PrecisionMethod::Threshold] {
        match method.codon_precision(&choices, threshold) {
            Ok(bits) => eprintln!("  {:<10} {} bits", method.name(), bits),
            Err(e) => eprintln!("  {:<10} {}", method.name(), e),
        }
    }

    let plan = config.decoding.resolve_choices(choices)?;
    eprintln!(
        "Using {} mapping at {} bits ({} bits per gene)",
        config.decoding.mapping,
        plan.precision,
        plan.gene_length()
    );

    // Decode a sample population to confirm the layout end to end
    let genes = GeneInitializer::from_config(&config.initialization, &plan)?.initial_population();
    let decisions = genes
        .iter()
        .map(|gene| plan.decisions(gene).map(|d| d.len()))
        .sum::<codonbias::Result<usize>>()?;
    eprintln!("Decoded {} random genes into {} decisions", genes.len(), decisions);

    println!("{}", plan.report()?.to_json()?);
    Ok(())
}
