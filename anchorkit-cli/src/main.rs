use anchorkit::{
    AnchorLayout, Detection, HeadTensors, OverlapMetric, PostprocessConfig, Postprocessor,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "anchorkit post-processing CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OverlapConfig {
    Iou,
    MinArea,
}

impl From<OverlapConfig> for OverlapMetric {
    fn from(value: OverlapConfig) -> Self {
        match value {
            OverlapConfig::Iou => OverlapMetric::Iou,
            OverlapConfig::MinArea => OverlapMetric::MinArea,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HeadConfig {
    map_width: usize,
    map_height: usize,
    stride: usize,
    anchor_sizes: Vec<usize>,
}

impl From<HeadConfig> for AnchorLayout {
    fn from(value: HeadConfig) -> Self {
        AnchorLayout::new(
            value.map_width,
            value.map_height,
            value.stride,
            value.anchor_sizes,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PostprocessJson {
    score_threshold: f32,
    nms_threshold: f32,
    overlap: OverlapConfig,
    num_classes: usize,
    apply_regression: bool,
    calibrate_offsets: bool,
    calibrate_landmarks: bool,
    square_output: bool,
    height_scale: f32,
    width_scale: f32,
    image_width: usize,
    image_height: usize,
}

impl Default for PostprocessJson {
    fn default() -> Self {
        let cfg = PostprocessConfig::default();
        Self {
            score_threshold: cfg.score_threshold,
            nms_threshold: cfg.nms_threshold,
            overlap: OverlapConfig::Iou,
            num_classes: cfg.num_classes,
            apply_regression: cfg.apply_regression,
            calibrate_offsets: cfg.calibrate_offsets,
            calibrate_landmarks: cfg.calibrate_landmarks,
            square_output: cfg.square_output,
            height_scale: cfg.height_scale,
            width_scale: cfg.width_scale,
            image_width: cfg.image_width,
            image_height: cfg.image_height,
        }
    }
}

impl From<PostprocessJson> for PostprocessConfig {
    fn from(value: PostprocessJson) -> Self {
        Self {
            score_threshold: value.score_threshold,
            nms_threshold: value.nms_threshold,
            overlap: value.overlap.into(),
            num_classes: value.num_classes,
            apply_regression: value.apply_regression,
            calibrate_offsets: value.calibrate_offsets,
            calibrate_landmarks: value.calibrate_landmarks,
            square_output: value.square_output,
            height_scale: value.height_scale,
            width_scale: value.width_scale,
            image_width: value.image_width,
            image_height: value.image_height,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensors_path: String,
    output_path: Option<String>,
    heads: Vec<HeadConfig>,
    postprocess: PostprocessJson,
}

/// Raw outputs of one head as dumped by the inference runtime.
#[derive(Debug, Deserialize)]
struct HeadDump {
    scores: Vec<f32>,
    offsets: Vec<f32>,
    #[serde(default)]
    landmarks: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct TensorDump {
    heads: Vec<HeadDump>,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    category: usize,
    score: f32,
    bbox: [f32; 4],
    landmarks: Vec<[f32; 2]>,
}

impl From<&Detection> for DetectionRecord {
    fn from(value: &Detection) -> Self {
        let b = value.bbox;
        Self {
            category: value.category,
            score: value.score,
            bbox: [b.x1, b.y1, b.x2, b.y2],
            landmarks: value.landmarks.points().map(|(x, y)| [x, y]).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("anchorkit=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensors_path.is_empty() {
        return Err("tensors_path must be set in the config".into());
    }
    if config.heads.is_empty() {
        return Err("at least one head must be listed in the config".into());
    }

    let dump: TensorDump = serde_json::from_str(&fs::read_to_string(&config.tensors_path)?)?;
    let tensors: Vec<HeadTensors<'_>> = dump
        .heads
        .iter()
        .map(|head| HeadTensors {
            scores: &head.scores,
            offsets: &head.offsets,
            landmarks: head.landmarks.as_deref(),
        })
        .collect();

    let layouts = config.heads.into_iter().map(AnchorLayout::from).collect();
    let processor = Postprocessor::new(layouts).with_config(config.postprocess.into());
    let detections = processor.run(&tensors)?;

    let output = Output {
        count: detections.len(),
        detections: detections.iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
