use proptest::prelude::*;
use traffic::{
    generate_car_matrix, get_bus_indexes, get_type_count, multiply_matrix, IdLabel, LabeledMatrix,
    Table,
};

fn traffic_rows() -> impl Strategy<Value = Vec<(u8, u8, u16)>> {
    prop::collection::vec((0u8..12, 0u8..12, 0u16..60), 1..40)
}

fn table_of(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    Table::new(headers.iter().map(|h| h.to_string()).collect(), rows)
}

proptest! {
    #[test]
    fn car_matrix_diagonal_is_zero_and_cells_match(rows in traffic_rows()) {
        let records: Vec<Vec<String>> = rows
            .iter()
            .map(|(a, b, car)| vec![a.to_string(), b.to_string(), car.to_string()])
            .collect();
        let m = generate_car_matrix(&table_of(&["id_1", "id_2", "car"], records)).unwrap();

        let (n, k) = m.shape();
        prop_assert_eq!(n, k);
        for i in 0..n {
            prop_assert_eq!(m.values[i][i], 0.0);
        }

        // Pairs seen exactly once keep their value as-is.
        for (a, b, car) in &rows {
            let same_pair = rows.iter().filter(|(x, y, _)| x == a && y == b).count();
            if a != b && same_pair == 1 {
                let cell = m.get(&IdLabel::Int(*a as i64), &IdLabel::Int(*b as i64));
                prop_assert_eq!(cell, Some(*car as f64));
            }
        }
    }

    #[test]
    fn type_counts_sum_to_row_count(cars in prop::collection::vec(-50.0f64..100.0, 0..60)) {
        let records: Vec<Vec<String>> = cars.iter().map(|c| vec![c.to_string()]).collect();
        let counts = get_type_count(&table_of(&["car"], records)).unwrap();

        prop_assert_eq!(counts.len(), 3);
        prop_assert_eq!(counts.values().sum::<usize>(), cars.len());
    }

    #[test]
    fn bus_outliers_respect_threshold(buses in prop::collection::vec(0u32..500, 0..60)) {
        let records: Vec<Vec<String>> = buses.iter().map(|b| vec![b.to_string()]).collect();
        let indexes = get_bus_indexes(&table_of(&["bus"], records)).unwrap();

        prop_assert!(indexes.windows(2).all(|w| w[0] < w[1]));
        if buses.is_empty() {
            prop_assert!(indexes.is_empty());
        } else {
            let mean = buses.iter().map(|&b| b as f64).sum::<f64>() / buses.len() as f64;
            for (i, &bus) in buses.iter().enumerate() {
                prop_assert_eq!(indexes.contains(&i), bus as f64 > 2.0 * mean);
            }
        }
    }

    #[test]
    fn rescale_is_deterministic_and_keeps_shape(
        values in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 3), 1..6)
    ) {
        let rows: Vec<IdLabel> = (0..values.len() as i64).map(IdLabel::Int).collect();
        let columns: Vec<IdLabel> = (0..3).map(IdLabel::Int).collect();
        let matrix = LabeledMatrix {
            index_name: "id_1".to_string(),
            rows,
            columns,
            values,
        };

        let once = multiply_matrix(&matrix);
        prop_assert_eq!(&once, &multiply_matrix(&matrix));
        prop_assert_eq!(once.shape(), matrix.shape());

        for (orig_row, out_row) in matrix.values.iter().zip(&once.values) {
            for (&v, &out) in orig_row.iter().zip(out_row) {
                let expected = if v > 20.0 {
                    v * 0.75
                } else if v >= 0.0 {
                    v * 1.25
                } else {
                    v
                };
                prop_assert!((out - expected).abs() <= 0.05 + 1e-9);
            }
        }
    }
}
