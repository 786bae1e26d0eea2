use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use meal_label::auth::{self, NoopIdentityProvider};
use meal_label::{
    Event, FormFields, FormSource, HtmlForm, ImageLoader, IngredientStore, LabelConfig, MemorySink,
    NutritionImage, RenderDriver,
};

#[derive(Parser)]
#[command(name = "meal-label")]
#[command(about = "Compose printable prepared-meal labels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding label strings and constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the label preview
    Render {
        /// Read the form fields from a host HTML page instead of flags
        #[arg(long, conflicts_with_all = ["product", "meal", "dietary", "handling"])]
        form_html: Option<PathBuf>,

        #[arg(long)]
        product: Option<String>,

        #[arg(long)]
        meal: Option<String>,

        /// One of the configured dietary options
        #[arg(long)]
        dietary: Option<String>,

        #[arg(long)]
        handling: Option<String>,

        /// Ingredient as NAME or NAME:UNIT (repeatable). The unit is whatever
        /// follows the last colon; end with ':' to keep colons in NAME and
        /// use the default unit, e.g. "Ratio 1:2:"
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        /// Nutrition label photo as INDEX=PATH, INDEX counted from 1 (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Start from an empty ingredient list instead of the examples
        #[arg(long)]
        no_examples: bool,

        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,

        /// Write the label here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the ingredient editor rows to this file
        #[arg(long)]
        editor_output: Option<PathBuf>,

        /// How long to wait for image decodes (milliseconds)
        #[arg(long, default_value = "5000")]
        wait_ms: u64,
    },

    /// Check that a file is usable as a nutrition label photo
    CheckImage {
        path: PathBuf,
    },
}

struct RenderOptions {
    ingredients: Vec<String>,
    images: Vec<String>,
    no_examples: bool,
    format: Format,
    output: Option<PathBuf>,
    editor_output: Option<PathBuf>,
    wait: Duration,
}

/// Split `NAME[:UNIT]` at the last colon. An empty unit means the default.
fn parse_ingredient(arg: &str) -> (&str, &str) {
    match arg.rsplit_once(':') {
        Some((name, unit)) if !unit.trim().is_empty() => (name, unit.trim()),
        Some((name, _)) => (name, meal_label::store::DEFAULT_UNIT),
        None => (arg, meal_label::store::DEFAULT_UNIT),
    }
}

fn parse_image(arg: &str) -> Result<(usize, PathBuf)> {
    let (index, path) = arg
        .split_once('=')
        .with_context(|| format!("image must be INDEX=PATH, got {:?}", arg))?;
    let index: usize = index
        .trim()
        .parse()
        .with_context(|| format!("invalid image index {:?}", index))?;
    if index == 0 {
        bail!("image indices start at 1");
    }
    Ok((index - 1, PathBuf::from(path)))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, content).with_context(|| format!("writing {}", p.display())),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

fn run_render<F: FormSource>(config: LabelConfig, form: F, opts: RenderOptions) -> Result<()> {
    let mut store = if opts.no_examples {
        IngredientStore::new()
    } else {
        IngredientStore::with_examples()
    };
    for arg in &opts.ingredients {
        let (name, unit) = parse_ingredient(arg);
        store.add_with(name, unit);
    }

    let mut identity = NoopIdentityProvider::new();
    auth::bootstrap_from_env(&mut identity);

    let mut driver = RenderDriver::with_store(config, store, form, MemorySink::default());
    driver.start();

    let loader = ImageLoader::new();
    let ids = driver.store().ids();
    for arg in &opts.images {
        let (index, path) = parse_image(arg)?;
        let Some(id) = ids.get(index) else {
            bail!("image index {} but only {} ingredients", index + 1, ids.len());
        };
        loader.request(*id, path);
    }
    for completion in loader.wait_all(opts.wait) {
        driver.dispatch(Event::ImageDecoded(completion));
    }
    if loader.pending() > 0 {
        log::warn!("{} image(s) still decoding after {:?}", loader.pending(), opts.wait);
    }

    let doc = match driver.last_document() {
        Some(doc) => doc,
        None => bail!("nothing was rendered"),
    };
    let rendered = match opts.format {
        Format::Html => driver.sink().label().to_string(),
        Format::Text => doc.to_text(),
        Format::Json => doc.to_json()?,
    };
    write_output(opts.output.as_deref(), &rendered)?;
    if let Some(path) = opts.editor_output.as_deref() {
        write_output(Some(path), driver.sink().editor())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LabelConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LabelConfig::default(),
    };

    match cli.command {
        Commands::Render {
            form_html,
            product,
            meal,
            dietary,
            handling,
            ingredients,
            images,
            no_examples,
            format,
            output,
            editor_output,
            wait_ms,
        } => {
            let opts = RenderOptions {
                ingredients,
                images,
                no_examples,
                format,
                output,
                editor_output,
                wait: Duration::from_millis(wait_ms),
            };
            if let Some(path) = form_html {
                let form = HtmlForm::from_path(&path)?;
                return run_render(config, form, opts);
            }

            let mut form = FormFields::new(&config);
            form.product_name = product.unwrap_or_default();
            form.meal_name = meal.unwrap_or_default();
            form.handling_instructions = handling.unwrap_or_default();
            if let Some(choice) = dietary {
                if !form.select_dietary(&choice) {
                    bail!(
                        "unknown dietary option {:?}; expected one of: {}",
                        choice,
                        form.dietary_options().join(", ")
                    );
                }
            }
            run_render(config, form, opts)
        }

        Commands::CheckImage { path } => {
            let image = NutritionImage::from_path(&path)
                .with_context(|| format!("checking {}", path.display()))?;
            println!("{} {} bytes", image.mime().as_str(), image.byte_len());
            Ok(())
        }
    }
}
