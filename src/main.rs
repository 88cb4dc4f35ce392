use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, LevelFilter};
use serde_json::json;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use surface_relabel::surface::{
  rewrite_labels, strip_function_prefix, strip_redundant_prefix,
  AxisLabelSet, LabelAlphabet, PropertyUpdate, RewriteStrategy,
  SubstitutionPlan, SurfaceFamily, SurfaceState,
};
use surface_relabel::syntax::expr_to_latex;
use surface_relabel::LatexParser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Raise the log level (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Silence all logging
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Make a label dependent and print the resulting property updates
  Relabel {
    #[arg(long, value_enum, default_value_t = Family::Parametric)]
    family: Family,
    /// Custom alphabet, e.g. `s,t,h`. Overrides the family's alphabet
    #[arg(long)]
    alphabet: Option<String>,
    /// Current labels as `labelU,labelV,labelW`
    #[arg(long)]
    labels: Option<String>,
    /// The label that becomes dependent
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "")]
    expr: String,
    #[arg(long, default_value = "")]
    range_u: String,
    #[arg(long, default_value = "")]
    range_v: String,
    /// Substitute tokens in the text as typed instead of rewriting the tree
    #[arg(long)]
    text: bool,
    #[arg(long)]
    json: bool,
  },
  /// Substitute labels in a formula
  Substitute {
    #[arg(long)]
    expr: String,
    /// `old=new`, may be repeated
    #[arg(long = "map", required = true)]
    mappings: Vec<String>,
    #[arg(long)]
    text: bool,
  },
  /// Print a `_f(var)=` prefixed formula the way its input displays it
  StripPrefix {
    #[arg(long)]
    latex: String,
    #[arg(long)]
    var: String,
    /// Byte length of the prefix, defaults to the length of `_f(var)=`
    #[arg(long)]
    prefix_length: Option<usize>,
  },
  /// Parse a formula and print its normalized form and free variables
  Parse {
    formula: String,
    #[arg(long)]
    json: bool,
  },
  /// Print input prefixes, captions and displayed ranges for a label set
  Fields {
    #[arg(long)]
    labels: String,
    #[arg(long, default_value = "")]
    range_u: String,
    #[arg(long, default_value = "")]
    range_v: String,
    #[arg(long)]
    json: bool,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum Family {
  Parametric,
  Explicit,
  ExplicitPolar,
}

impl From<Family> for SurfaceFamily {
  fn from(family: Family) -> Self {
    match family {
      Family::Parametric => SurfaceFamily::Parametric,
      Family::Explicit => SurfaceFamily::Explicit,
      Family::ExplicitPolar => SurfaceFamily::ExplicitPolar,
    }
  }
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
  if quiet {
    return LevelFilter::Off;
  }
  match verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

fn parse_label_set(text: &str) -> Result<AxisLabelSet> {
  let parts: Vec<&str> = text.split(',').map(str::trim).collect();
  match parts.as_slice() {
    [u, v, w] => Ok(AxisLabelSet::new(*u, *v, *w)),
    _ => bail!("expected `labelU,labelV,labelW`, got `{}`", text),
  }
}

fn parse_plan(mappings: &[String]) -> Result<SubstitutionPlan> {
  let mut plan = SubstitutionPlan::new();
  for mapping in mappings {
    let Some((old, new)) = mapping.split_once('=') else {
      bail!("expected `old=new`, got `{}`", mapping);
    };
    plan.insert(old.trim(), new.trim());
  }
  Ok(plan)
}

fn strategy(text: bool) -> RewriteStrategy {
  if text {
    RewriteStrategy::Text
  } else {
    RewriteStrategy::default()
  }
}

fn print_updates(updates: &[PropertyUpdate], as_json: bool) {
  if as_json {
    let entries: Vec<_> = updates
      .iter()
      .map(|u| json!({ "property": u.property.name(), "value": u.value }))
      .collect();
    println!("{}", json!(entries));
    return;
  }
  if updates.is_empty() {
    info!("nothing to update");
  }
  for update in updates {
    println!("{} = {}", update.property, update.value);
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  CombinedLogger::init(vec![TermLogger::new(
    log_level(cli.verbose, cli.quiet),
    Config::default(),
    TerminalMode::Stderr,
    ColorChoice::Auto,
  )])
  .context("failed to install the terminal logger")?;

  match cli.command {
    Commands::Relabel {
      family,
      alphabet,
      labels,
      to,
      expr,
      range_u,
      range_v,
      text,
      json,
    } => {
      let alphabet = match alphabet {
        Some(raw) => raw
          .parse::<LabelAlphabet>()
          .with_context(|| format!("invalid --alphabet `{}`", raw))?,
        None => SurfaceFamily::from(family).alphabet(),
      };
      let labels = match labels {
        Some(raw) => parse_label_set(&raw).context("invalid --labels")?,
        None => alphabet.default_labels(),
      };
      debug!("relabeling {} over alphabet {}", labels, alphabet);
      let state = SurfaceState::new(expr, range_u, range_v, labels);
      let updates = state
        .relabel(&alphabet, &to, strategy(text))
        .with_context(|| format!("cannot make `{}` dependent", to))?;
      print_updates(&updates, json);
    }
    Commands::Substitute {
      expr,
      mappings,
      text,
    } => {
      let plan = parse_plan(&mappings).context("invalid --map")?;
      println!("{}", rewrite_labels(&expr, &plan, strategy(text)));
    }
    Commands::StripPrefix {
      latex,
      var,
      prefix_length,
    } => {
      let shown = match prefix_length {
        Some(length) => strip_redundant_prefix(&LatexParser, &latex, &var, length),
        None => strip_function_prefix(&LatexParser, &latex, &var),
      };
      println!("{}", shown);
    }
    Commands::Parse { formula, json } => {
      let tree = surface_relabel::parse(&formula)
        .with_context(|| format!("cannot parse `{}`", formula))?;
      let variables: Vec<String> = tree.free_variables().into_iter().collect();
      if json {
        println!(
          "{}",
          json!({
            "latex": expr_to_latex(&tree),
            "assignment": tree.is_function_assignment(),
            "freeVariables": variables,
          })
        );
      } else {
        println!("{}", expr_to_latex(&tree));
        println!("assignment: {}", tree.is_function_assignment());
        println!("free variables: {}", variables.join(", "));
      }
    }
    Commands::Fields {
      labels,
      range_u,
      range_v,
      json,
    } => {
      let labels = parse_label_set(&labels).context("invalid --labels")?;
      labels.validate().context("invalid --labels")?;
      let state = SurfaceState::new("", range_u, range_v, labels);
      let prefixes = state.prefixes();
      let captions = state.captions();
      let (shown_u, shown_v) = state.display_ranges(&LatexParser);
      if json {
        println!(
          "{}",
          json!({
            "prefixes": {
              "expr": prefixes.expr,
              "rangeU": prefixes.range_u,
              "rangeV": prefixes.range_v,
            },
            "captions": {
              "rangeU": captions.range_u,
              "rangeV": captions.range_v,
              "samplesU": captions.samples_u,
              "samplesV": captions.samples_v,
              "gridlinesU": captions.gridlines_u,
              "gridlinesV": captions.gridlines_v,
            },
            "ranges": { "rangeU": shown_u, "rangeV": shown_v },
          })
        );
      } else {
        println!("expr prefix: {}", prefixes.expr);
        println!("{} {}", captions.range_u, shown_u);
        println!("{} {}", captions.range_v, shown_v);
        println!("{}, {}", captions.samples_u, captions.samples_v);
        println!("{}, {}", captions.gridlines_u, captions.gridlines_v);
      }
    }
  }

  Ok(())
}
