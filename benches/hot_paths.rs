use criterion::{black_box, criterion_group, criterion_main, Criterion};
use covid_trace::data::{read_case_records, CaseTable, CountyTable, Dataset, Statistic};
use covid_trace::map::{Lod, MapRenderer, Viewport};
use covid_trace::trace::CovidTrace;
use covid_trace::viz::{Plot, PlotOptions, REDS};

/// A 60 x 50 grid of counties spread over the contiguous US
fn dataset() -> Dataset {
    let mut cases = String::from("date,county,state,fips,cases,deaths\n");
    let mut geocodes = String::from("zip,state,county,latitude,longitude,estimated_population\n");
    for row in 0..50 {
        for col in 0..60 {
            let name = format!("C{row}_{col}");
            let lat = 25.0 + row as f64 * 0.5;
            let lon = -124.0 + col as f64 * 0.95;
            cases.push_str(&format!("2021-03-01,{name},California,,{},0\n", (row * col) % 5000));
            geocodes.push_str(&format!("{row}{col},CA,{name},{lat},{lon},{}\n", 1000 + row * col * 50));
        }
    }
    Dataset::new(
        CaseTable::from_records(read_case_records(cases.as_bytes()).unwrap()),
        CountyTable::from_reader(geocodes.as_bytes()).unwrap(),
    )
}

fn bench_trace_selection(c: &mut Criterion) {
    let dataset = dataset();
    c.bench_function("trace_100mi_of_3000_counties", |b| {
        b.iter(|| {
            let trace =
                CovidTrace::new("C25_30", "CA", Statistic::Cases, black_box(100.0), &dataset).unwrap();
            black_box(trace.rows().len());
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let dataset = dataset();
    let traces = vec![
        CovidTrace::new("C10_10", "CA", Statistic::Cases, 300.0, &dataset).unwrap(),
        CovidTrace::new("C40_50", "CA", Statistic::Cases, 300.0, &dataset).unwrap(),
    ];
    let plot = Plot::new(traces, PlotOptions::default()).unwrap();
    let mut renderer = MapRenderer::new();
    covid_trace::data::generate_simple_us(&mut renderer);
    let markers = plot.national_markers();

    c.bench_function("render_national_map_200x50", |b| {
        b.iter(|| {
            let viewport = Viewport::conus(400, 200);
            let layers = renderer.render(200, 50, &viewport, Lod::Low, &markers, REDS.len(), None);
            black_box(layers);
        });
    });
}

criterion_group!(benches, bench_trace_selection, bench_render);
criterion_main!(benches);
