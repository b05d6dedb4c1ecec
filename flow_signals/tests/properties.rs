use chrono::{Days, NaiveDate};
use flow_signals::{
    combined::{FlowInputs, TickerComponents},
    models::{DateSeries, NamedSeries},
    premium::net_premium,
    reconcile::{reconcile_union, subtract, sum},
    stats::{ma_ratio, z_scores},
};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Sparse series over the first 40 days of 2024.
fn sparse_series() -> impl Strategy<Value = DateSeries> {
    proptest::collection::btree_map(0u64..40, -1e6f64..1e6, 0..20).prop_map(|m| {
        m.into_iter()
            .map(|(offset, v)| (base() + Days::new(offset), v))
            .collect()
    })
}

fn keyed(key: &str, s: DateSeries) -> NamedSeries {
    [(key, s)].into_iter().collect()
}

proptest! {
    #[test]
    fn union_covers_both_date_sets(a in sparse_series(), b in sparse_series()) {
        let out = reconcile_union(&[&a, &b], subtract);
        let expected: Vec<NaiveDate> = a.dates().chain(b.dates())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        prop_assert_eq!(out.dates().collect::<Vec<_>>(), expected);

        for (date, v) in a.iter() {
            if b.get(date).is_none() {
                prop_assert_eq!(out.get(date), Some(v - 0.0));
            }
        }
    }

    #[test]
    fn combined_is_sum_of_components(
        retail in sparse_series(),
        sc in sparse_series(),
        sp in sparse_series(),
        lc in sparse_series(),
        lp in sparse_series(),
    ) {
        let inputs = FlowInputs {
            retail: keyed("AAPL", retail),
            small_call: keyed("OTM_small_AAPL", sc),
            small_put: keyed("OTM_small_AAPL", sp),
            large_call: keyed("OTM_large_AAPL", lc),
            large_put: keyed("OTM_large_AAPL", lp),
            ..Default::default()
        };
        let comps = TickerComponents::reconcile(&inputs, "AAPL");
        for rec in comps.records("AAPL") {
            prop_assert_eq!(
                rec.combined_value,
                rec.retail_component + rec.options_small_component + rec.options_large_component
            );
        }
        let via_union = reconcile_union(&[&comps.retail, &comps.small.net, &comps.large.net], sum);
        prop_assert_eq!(via_union, comps.combined());
    }

    #[test]
    fn swapping_call_and_put_negates_net(call in sparse_series(), put in sparse_series()) {
        let tickers = vec!["AAPL".to_string()];
        let call = keyed("AAPL", call);
        let put = keyed("AAPL", put);

        let forward = net_premium(&call, &put, &tickers).unwrap();
        let swapped = net_premium(&put, &call, &tickers).unwrap();
        prop_assert_eq!(forward.len(), swapped.len());
        for (f, s) in forward.iter().zip(&swapped) {
            prop_assert_eq!(f.date, s.date);
            prop_assert_eq!(f.value, -s.value);
        }
    }

    #[test]
    fn zero_long_mean_gives_neutral_ratio(values in proptest::collection::vec(-100i32..100, 1..40)) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let ratios = ma_ratio(&values);
        for i in 0..values.len() {
            let start = (i + 1).saturating_sub(21);
            if values[start..=i].iter().sum::<f64>() == 0.0 {
                prop_assert_eq!(ratios[i], 1.0);
            }
        }
    }

    #[test]
    fn z_scores_never_nan(values in proptest::collection::vec(-1e3f64..1e3, 0..50), w in 1usize..30) {
        prop_assert!(z_scores(&values, Some(w)).iter().all(|z| z.is_finite()));
    }
}
