use criterion::*;
use spx_spider::constituents::parse_listings;

// build a constituents page with `rows` data rows
fn build_page(rows: usize) -> String {
    let mut body = String::from(
        "<html><body><table class=\"wikitable sortable\" id=\"constituents\"><tbody>\
         <tr><th>Symbol</th><th>Security</th><th>SEC filings</th><th>GICS Sector</th>\
         <th>GICS Sub-Industry</th><th>Headquarters Location</th><th>Date added</th></tr>",
    );
    for i in 0..rows {
        body.push_str(&format!(
            "<tr><td><a href=\"https://www.nyse.com/quote/XNYS:S{i}\">S{i}</a></td>\
             <td><a href=\"/wiki/Company_{i}\">Company {i}</a></td>\
             <td><a href=\"https://www.sec.gov/S{i}\">reports</a></td>\
             <td>Industrials</td><td>Industrial Machinery</td>\
             <td><a href=\"/wiki/City_{i}\">City {i}, State</a></td><td>2000-01-01</td></tr>"
        ));
    }
    body.push_str("</tbody></table></body></html>");
    body
}

fn benchmark_parse(c: &mut Criterion) {
    let page = build_page(503);

    c.bench_function("parse constituents", |b| {
        b.iter(|| {
            let _listings = parse_listings(black_box(&page), black_box(500)).unwrap();
        })
    });
}

criterion_group!(benches, benchmark_parse);
criterion_main!(benches);
