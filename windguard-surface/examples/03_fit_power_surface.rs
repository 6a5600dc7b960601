//! Power Surface Example
//!
//! Fits a loess surface to a small manufacturer sheet and prints the
//! expected power on a regular grid, including the reference density.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_fit_power_surface
//! ```

use windguard_surface::{DensityCodec, PowerCurveTable, PredictionGrid, SurfaceConfig, SurfaceFitter};

const SHEET: &str = "\
ws,P_095,P_105,P_115,P_1225,P_130
3,16.3,17.5,18.7,19.6,20.5
4,32.7,36.0,39.3,41.8,44.4
5,65.3,73.3,81.6,88.1,94.9
6,128.0,146.4,165.8,181.0,196.8
7,243.5,281.7,322.0,353.5,386.0
8,438.8,508.0,579.1,633.3,687.7
9,725.9,828.3,928.0,1000.0,1069.1
10,1072.0,1189.7,1295.4,1366.7,1431.4
11,1401.5,1506.0,1592.2,1646.5,1693.1
12,1652.0,1727.2,1784.8,1819.0,1847.2
13,1811.8,1858.6,1892.5,1911.9,1927.3
14,1902.5,1929.3,1947.9,1958.2,1966.1";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("WindGuard Power Surface Example");
    println!("===============================\n");

    let table = PowerCurveTable::from_csv(SHEET, &DensityCodec::Heuristic)?;
    println!(
        "Parsed {} entries: {} speeds x {} densities",
        table.len(),
        table.wind_speeds().len(),
        table.columns().len()
    );

    let config = SurfaceConfig::near_interpolating().with_span(0.2);
    let model = SurfaceFitter::new(config)?.fit(&table)?;
    if let Some(stats) = model.summary().statistics {
        println!(
            "Fit: enp={:.1} s={:.3} kW max|r|={:.3} kW\n",
            stats.equivalent_parameters, stats.residual_scale, stats.max_abs_residual
        );
    }

    let grid = PredictionGrid::with_steps(model.bounds(), 1.0, 0.05)?;
    let predictions = model.predictor().predict_grid(&grid)?;

    print!("{:>6}", "v");
    for rho in grid.air_densities() {
        print!(" {:>9.3}", rho);
    }
    println!();
    for (i, ws) in grid.wind_speeds().iter().enumerate() {
        print!("{:>6.1}", ws);
        for j in 0..grid.air_densities().len() {
            let p = &predictions[j * grid.wind_speeds().len() + i];
            print!(" {:>9.1}", p.power);
        }
        println!();
    }

    let off = model.predictor().predict_with_se(16.0, 1.225)?;
    println!(
        "\nv=16 m/s at 1.225 kg/m³: {:.1} kW (extrapolated: {})",
        off.power, off.extrapolated
    );
    Ok(())
}

