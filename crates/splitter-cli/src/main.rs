use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use splitter_core::{SplitPlan, SplitRequest, SplitResult, Splitter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "splitter")]
#[command(about = "Shopping List Splitter - Distribute line items across budget groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a shopping list across groups
    Split {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from result
    Generate {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split { input, output } => {
            split_command(input, output)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

fn split_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    // Read input file
    let content = std::fs::read_to_string(&input)?;
    let request: SplitRequest = if input.extension().and_then(|s| s.to_str()) == Some("yaml")
        || input.extension().and_then(|s| s.to_str()) == Some("yml")
    {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    let unit_count: u32 = request.items.iter().map(|i| i.quantity).sum();
    println!(
        "  {} items ({} units) to distribute",
        request.items.len().to_string().bright_white().bold(),
        unit_count.to_string().bright_white()
    );
    match &request.plan {
        SplitPlan::Uniform {
            target_amount,
            number_of_groups,
        } => println!(
            "  {} groups targeting {} each",
            number_of_groups.to_string().bright_white().bold(),
            format!("{target_amount:.2}").bright_white()
        ),
        SplitPlan::Tiered { group_specs } => println!(
            "  {} group specs with individual targets",
            group_specs.len().to_string().bright_white().bold()
        ),
    }
    println!();

    println!("{}", "🚀 Splitting...".bright_blue());

    let splitter = Splitter::new(request)?;
    let result = splitter.split();

    println!();
    println!("{}", "✅ Split complete!".bright_green().bold());
    println!();

    // Display results
    println!("{}", "📊 Results:".bright_yellow().bold());
    for group in &result.groups {
        let excess = group.total - group.target_amount;
        let deviation = if excess > 0.0 {
            format!("(+{excess:.2})").bright_red()
        } else if excess < 0.0 {
            format!("({excess:.2})").bright_white()
        } else {
            "(exact)".bright_green()
        };
        println!(
            "    • Group {}: {} / target {} {} — {} units",
            group.number,
            format!("{:.2}", group.total).bright_white().bold(),
            format!("{:.2}", group.target_amount),
            deviation,
            group.units.len()
        );
    }
    println!();
    println!(
        "  Grand total: {}",
        format!("{:.2}", result.summary.grand_total)
            .bright_white()
            .bold()
    );
    println!(
        "  Total excess: {}",
        format!("{:.2}", result.summary.total_excess).bright_white()
    );
    println!(
        "  Worst deviation: {}",
        format!("{:.2}", result.summary.worst_deviation).bright_white()
    );
    println!();

    // Save output
    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        // Print to stdout
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    }

    Ok(())
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    // Read result file
    let content = std::fs::read_to_string(&input)?;
    let result: SplitResult = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = generate_simple_svg(&result)?;

    // Save SVG
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}

fn generate_simple_svg(result: &SplitResult) -> Result<String> {
    use std::fmt::Write;

    let mut svg = String::new();
    let margin = 20.0;
    let column_width = 140.0;
    let column_spacing = 30.0;
    let chart_height = 400.0;

    let max_amount = result
        .groups
        .iter()
        .map(|g| g.total.max(g.target_amount))
        .fold(1.0, f64::max);
    let scale = chart_height / max_amount;

    let svg_width =
        (result.groups.len() as f64) * (column_width + column_spacing) + 2.0 * margin;
    let svg_height = chart_height + 2.0 * margin + 40.0;

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    let baseline = margin + chart_height;

    for (idx, group) in result.groups.iter().enumerate() {
        let x = margin + (idx as f64) * (column_width + column_spacing);

        // Column background
        writeln!(
            &mut svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#fff" stroke="#333" stroke-width="2"/>"##,
            x, margin, column_width, chart_height
        )?;

        // Group label
        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">Group {} — {:.2}</text>"##,
            x,
            margin - 5.0,
            group.number,
            group.total
        )?;

        // Stacked unit rectangles, bottom up
        let mut y_cursor = baseline;
        for unit in &group.units {
            let height = (unit.value * scale).max(1.0);
            y_cursor -= height;

            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.7"/>"##,
                x + 2.0,
                y_cursor,
                column_width - 4.0,
                height - 1.0
            )?;

            let label = if unit.original_quantity > 1 {
                format!(
                    "{} ({}/{})",
                    unit.name, unit.unit_index, unit.original_quantity
                )
            } else {
                unit.name.clone()
            };

            writeln!(
                &mut svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#fff" text-anchor="middle">{}</text>"##,
                x + column_width / 2.0,
                y_cursor + height / 2.0 + 3.0,
                label
            )?;
        }

        // Target line across the column
        let target_y = baseline - group.target_amount * scale;
        writeln!(
            &mut svg,
            r##"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#E65100" stroke-width="2" stroke-dasharray="6 3"/>"##,
            x,
            target_y,
            x + column_width,
            target_y
        )?;
        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#E65100">target {:.2}</text>"##,
            x + 2.0,
            target_y - 3.0,
            group.target_amount
        )?;
    }

    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">Groups: {} | Excess: {:.2}</text>"##,
        margin,
        svg_height - margin + 10.0,
        result.summary.group_count,
        result.summary.total_excess
    )?;

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}
