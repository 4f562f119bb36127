#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use open_table::{Table, TableConfig};
use plotters::prelude::*;
use rand::{Rng, distr::Alphanumeric};

// Fixed slot count so every load factor is measured on the same table size
const TABLE_SIZE: usize = 10_007;
// Load factors from 0.1 to 0.9 in 9 steps
const NUM_LOAD_FACTORS: usize = 9;
const KEY_LEN: usize = 12;

/// Probe statistics of one filled table
struct Measurement {
    load: f64,
    average: f64,
    worst: usize,
}

fn random_key(rng: &mut impl Rng) -> String {
    rng.sample_iter(&Alphanumeric).take(KEY_LEN).map(char::from).collect()
}

fn measure(keys: &[String]) -> Result<Measurement, Box<dyn std::error::Error>> {
    // Thresholds wide enough that the table never resizes while filling
    let config = TableConfig { base_size: TABLE_SIZE, grow_percent: 95, shrink_percent: 0 };
    let mut table = Table::with_config(config)?;
    for key in keys {
        table.upsert(key, "")?;
    }

    let lengths: Vec<usize> = keys.iter().filter_map(|key| table.probe_length(key)).collect();
    let average = lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64;
    let worst = lengths.iter().copied().max().unwrap_or(0);

    Ok(Measurement { load: table.len() as f64 / table.capacity() as f64, average, worst })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("OPEN_TABLE_LOG", "info"))
        .init();

    let load_factors: Vec<f64> =
        (0..NUM_LOAD_FACTORS).map(|i| 0.1 + 0.8 * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64)).collect();
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_SIZE as f64 * load) as usize).collect();

    // Generate random keys once so every load factor sees a prefix of the same set
    let mut rng = rand::rng();
    let max_keys_needed = num_keys.iter().copied().max().unwrap_or(0);
    let keys: Vec<String> = (0..max_keys_needed).map(|_| random_key(&mut rng)).collect();

    let mut results = Vec::with_capacity(num_keys.len());
    for &n_keys in &num_keys {
        let measurement = measure(&keys[..n_keys])?;
        log::info!(
            "load {:.2}: avg probes = {:.2}, worst = {}",
            measurement.load,
            measurement.average,
            measurement.worst
        );
        results.push(measurement);
    }

    let font_family = "sans-serif";
    let root = BitMapBackend::new("probe_lengths.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_probes = results.iter().map(|m| m.worst).max().unwrap_or(1) as f64 * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Double Hashing Probe Lengths", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_probes)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc("Probes per Lookup")
        .axis_desc_style((font_family, 16))
        .draw()?;

    let average_style = ShapeStyle::from(&RGBColor(50, 90, 220)).stroke_width(2);
    chart
        .draw_series(LineSeries::new(results.iter().map(|m| (m.load, m.average)), average_style))?
        .label("Average")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], average_style));

    let worst_style = ShapeStyle::from(&RGBColor(220, 50, 50)).stroke_width(2);
    chart
        .draw_series(LineSeries::new(results.iter().map(|m| (m.load, m.worst as f64)), worst_style))?
        .label("Worst case")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], worst_style));

    // The default grow threshold
    let threshold_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(vec![(0.7, 0.0), (0.7, max_probes)], threshold_style))?
        .label("Grow threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;

    println!("Generated plot image: probe_lengths.png");
    Ok(())
}
