// Export one OpenTelemetry span per graph step to stdout.
//
// Uses whatever collaborators the environment enables (see the README); with
// none configured the run still completes with a fallback itinerary.
//
// Run: cargo run --example traced_trip

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::{Span, Tracer};
use opentelemetry_sdk::trace::SdkTracerProvider;
use trip_line::collab::Services;
use trip_line::config::Config;
use trip_line::travel::{Variant, build_graph};
use trip_line::{Ctx, Runner, TripState};

fn main() {
    dotenvy::dotenv().ok();

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();
    global::set_tracer_provider(provider.clone());
    let tracer = global::tracer("trip-line");

    let services = Services::from_config(&Config::from_env());
    let graph = build_graph(&services, Variant::default()).unwrap();

    let mut runner = Runner::new(graph).on_step(move |e| {
        let mut span = tracer.start(format!("step {}", e.step));
        span.set_attribute(KeyValue::new("trip.step_number", e.step_number as i64));
        span.set_attribute(KeyValue::new("trip.next", e.next.to_string()));
        span.set_attribute(KeyValue::new(
            "trip.elapsed_ms",
            e.duration.as_millis() as i64,
        ));
        span.end();
    });

    let mut ctx = Ctx::new();
    let seed = TripState::seed("Kyoto, Japan", "History, Matcha tea, and calm nature").with_budget(1500);
    let result = runner.run(seed, &mut ctx).unwrap();

    println!("=== Path ===");
    println!("  {}", ctx.path().join(" -> "));
    println!("=== Log ===");
    for entry in ctx.logs() {
        println!("  {entry}");
    }
    println!("=== Itinerary (revisions: {}) ===", result.revision_count);
    println!("{}", result.itinerary_text().unwrap_or("[no itinerary returned]"));

    if let Err(err) = provider.shutdown() {
        eprintln!("tracer shutdown failed: {err:?}");
    }
}
