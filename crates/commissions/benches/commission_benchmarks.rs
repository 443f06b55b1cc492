use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use investpro_commissions::CommissionCalculator;
use investpro_conventions::{CalcBase, Convention, ConventionId, resolve_active};
use investpro_core::{Amount, FixedClock, Rate, RecordId};
use investpro_expenses::{Expense, ExpenseId};
use investpro_suppliers::{ContactInfo, Supplier, SupplierId, TaxIdentifiers};
use rust_decimal::Decimal;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixture_supplier() -> Supplier {
    Supplier::new(
        SupplierId::new(RecordId::new()),
        "F-001",
        "Atlas Travaux SARL",
        TaxIdentifiers::default(),
        ContactInfo::default(),
        true,
        date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap().and_utc(),
    )
    .unwrap()
}

fn fixture_expense(supplier: &Supplier) -> Expense {
    let mut expense = Expense::new(
        ExpenseId::new(RecordId::new()),
        "FAC-2024-0042",
        date(2024, 4, 1),
        supplier.id_typed(),
        Some(Amount::new(Decimal::new(12_345_678, 2))),
        None,
        date(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap().and_utc(),
    )
    .unwrap();
    expense.derive_amounts(supplier);
    expense
}

fn fixture_convention(index: usize) -> Convention {
    // Yearly windows so only a fraction of the set matches any query date.
    let year = 2000 + (index % 30) as i32;
    Convention::new(
        ConventionId::new(RecordId::new()),
        format!("CONV-{year}-{index:04}"),
        format!("Convention {index}"),
        Rate::new(Decimal::new(250, 2)),
        if index % 2 == 0 { CalcBase::Ht } else { CalcBase::Ttc },
        None,
        date(year, 1, 1),
        Some(date(year, 12, 31)),
        date(year, 1, 1).and_hms_opt(0, 0, 0).unwrap().and_utc(),
    )
    .unwrap()
}

fn bench_derive_amounts(c: &mut Criterion) {
    let supplier = fixture_supplier();
    let expense = fixture_expense(&supplier);

    c.bench_function("derive_amounts", |b| {
        b.iter(|| {
            let mut fresh = expense.clone();
            fresh.derive_amounts(black_box(&supplier));
            fresh
        })
    });
}

fn bench_calculate_commission(c: &mut Criterion) {
    let supplier = fixture_supplier();
    let expense = fixture_expense(&supplier);
    let convention = fixture_convention(0);
    let calculator = CommissionCalculator::new(Arc::new(FixedClock::on(date(2024, 5, 6))));

    c.bench_function("calculate_commission", |b| {
        b.iter(|| {
            calculator
                .calculate(black_box(&expense), black_box(&convention))
                .unwrap()
        })
    });
}

fn bench_resolve_active(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_active");
    for size in [100usize, 1_000, 10_000] {
        let conventions: Vec<Convention> = (0..size).map(fixture_convention).collect();
        let query_date = date(2010, 6, 15);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &conventions, |b, set| {
            b.iter(|| resolve_active(black_box(set), black_box(query_date)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_derive_amounts,
    bench_calculate_commission,
    bench_resolve_active
);
criterion_main!(benches);
