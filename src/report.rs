use crate::events::Polarity;
use crate::reconstruction::{Reconstruction, TrackModel};
use colored::Colorize;

fn polarity_label(polarity: Polarity) -> colored::ColoredString {
    match polarity {
        Polarity::Normal => "normal".green(),
        Polarity::Reverse => "reverse".red(),
    }
}

impl TrackModel {
    pub fn print_summary(&self) {
        println!("\n🌊 === TRACK RECONSTRUCTION SUMMARY ===");
        println!(
            "↔️  Half-profiles: {} left segments ({:.2} km) | {} right segments ({:.2} km)",
            self.left.len(),
            self.left.total_distance(),
            self.right.len(),
            self.right.total_distance()
        );

        match self.layer.extent() {
            Some((start, end)) => println!(
                "🧲 Magnetized layer: {} blocks from {:.2} km to {:.2} km",
                self.layer.len(),
                start,
                end
            ),
            None => println!("🧲 Magnetized layer: {}", "empty".yellow()),
        }
        for segment in self.layer.segments() {
            println!(
                "  🔹 {:>9.2} .. {:>9.2} km | {:<7} | {:>6.2} A/m",
                segment.start,
                segment.end,
                polarity_label(segment.polarity),
                segment.magnetization
            );
        }

        if self.faults_and_rifts.is_empty() {
            println!("🪨 No pseudo-faults or failed rifts inside the track");
        } else {
            println!("🪨 Faults and rifts:");
            for event in &self.faults_and_rifts {
                let mut kinds = Vec::new();
                if event.pseudo_fault {
                    kinds.push("pseudo-fault");
                }
                if event.failed_rift {
                    kinds.push("failed rift");
                }
                println!("  📍 {:>9.2} km | {}", event.distance, kinds.join(" + ").cyan());
            }
        }

        let values = self.anomaly.values();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if values.is_empty() {
            println!("📈 Anomaly: {}", "no observation points".yellow());
        } else {
            println!(
                "📈 Anomaly: {} points, range {:.2} .. {:.2} nT",
                values.len(),
                min,
                max
            );
        }
        if !self.anomaly.skipped_blocks.is_empty() {
            println!(
                "⚠️  {} block(s) skipped at repeated bathymetry distances",
                self.anomaly.skipped_blocks.len().to_string().yellow()
            );
        }
        if let Some(rms) = self.rms_misfit {
            println!("🎯 RMS misfit against observed: {:.2} nT", rms);
        }
        println!("🌊 === END SUMMARY ===\n");
    }
}

impl Reconstruction {
    pub fn print_timing_report(&self) {
        println!("\n📊 === RECONSTRUCTION TIMING REPORT ===");
        println!("🔄 Tracks run: {}", self.tracks_run);
        println!();

        let total_time = self.total_time();

        println!("📈 PER-STAGE BREAKDOWN:");
        for timing in &self.timings {
            let percentage = if total_time.as_nanos() > 0 {
                (timing.elapsed.as_nanos() as f64 / total_time.as_nanos() as f64) * 100.0
            } else {
                0.0
            };

            println!(
                "  🔧 {:<20} | Total: {:>8.3}ms | Avg/track: {:>8.3}ms | Share: {:>5.1}%",
                timing.stage.name(),
                timing.elapsed.as_secs_f64() * 1000.0,
                timing.avg_time().as_secs_f64() * 1000.0,
                percentage
            );
        }

        println!();
        println!(
            "⏱️  TOTAL TIME: {:.3}ms ({:.3}s)",
            total_time.as_secs_f64() * 1000.0,
            total_time.as_secs_f64()
        );
        if self.tracks_run > 0 {
            println!(
                "🚀 Average time per track: {:.3}ms",
                total_time.as_secs_f64() * 1000.0 / self.tracks_run as f64
            );
        }
        println!("📊 === END TIMING REPORT ===\n");
    }
}
