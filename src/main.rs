use clap::Parser;
use ingredient_calculator::{compute, round_string, title_case, Error, RecipeGraph};
use rust_decimal::Decimal;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Totals every ingredient a recipe needs")]
struct Args {
    /// Recipe to produce; prompted for when omitted
    recipe: Option<String>,
    /// Amount of the recipe to produce
    #[arg(short = 'n', long, default_value = "1")]
    quantity: String,
    /// Edge list with Recipe, Ingredient and Ingredient Rate columns
    #[arg(long, default_value = "data/satisfactory_edge_list.csv")]
    data: PathBuf,
    /// Title-case the recipe name before looking it up
    #[arg(long)]
    title: bool,
    /// Print every recipe and ingredient name
    #[arg(long)]
    list: bool,
    /// Only print raw materials
    #[arg(long)]
    raw: bool,
    #[arg(long)]
    json: bool,
    /// Print the recipe's subgraph in Graphviz format
    #[arg(long)]
    render: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let graph = ingredient_calculator::load(&args.data)?;
    if args.list {
        for node in graph.nodes() {
            println!("{node}");
        }
        return Ok(());
    }

    let quantity = parse_quantity(&args.quantity);
    let normalize = |name: &str| {
        if args.title {
            title_case(name.trim())
        } else {
            name.trim().to_owned()
        }
    };
    let (recipe, requirements) = match &args.recipe {
        Some(recipe) => {
            let recipe = normalize(recipe);
            let requirements = compute(&graph, &recipe, quantity)?;
            (recipe, requirements)
        }
        None => prompt(io::stdin().lock(), &graph, quantity, normalize)?,
    };

    if args.render {
        print!(
            "{}",
            ingredient_calculator::compute::render(&graph, &recipe, quantity, &requirements)?
        );
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&requirements)?);
    } else {
        println!("{} of {recipe}", round_string(quantity));
        if args.raw {
            for (ingredient, required) in
                ingredient_calculator::compute::raw_materials(&graph, &requirements)
            {
                println!("{} {ingredient}", round_string(required));
            }
        } else {
            for (ingredient, required) in requirements.iter() {
                println!("{} {ingredient}", round_string(required));
            }
        }
    }
    Ok(())
}

/// Falls back to 1 when the quantity is not a number.
fn parse_quantity(s: &str) -> Decimal {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or_else(|_| {
            warn!(quantity = s, "not a number, using 1");
            Decimal::ONE
        })
}

fn prompt(
    input: impl BufRead,
    graph: &RecipeGraph,
    quantity: Decimal,
    normalize: impl Fn(&str) -> String,
) -> Result<(String, ingredient_calculator::Requirements), Box<dyn std::error::Error>> {
    for node in graph.nodes() {
        eprintln!("{node}");
    }
    let mut lines = input.lines();
    loop {
        eprint!("Enter one of the recipes above: ");
        io::stderr().flush()?;
        let Some(line) = lines.next() else {
            return Err("no recipe given".into());
        };
        let recipe = normalize(&line?);
        match compute(graph, &recipe, quantity) {
            Ok(requirements) => return Ok((recipe, requirements)),
            Err(err @ Error::InvalidRecipe { .. }) => eprintln!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
}
