//! Integration tests for FlatMatrix and its row/column views.

use memory_matrix::{detect_aliasing, Axis, FlatMatrix, MatrixError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn counting(rows: usize, cols: usize) -> FlatMatrix<i32> {
    let data = (0..(rows * cols) as i32).collect();
    FlatMatrix::from_shape_vec((rows, cols), data).unwrap()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn default_three_by_four_is_all_zero() {
    init_logging();
    let m = FlatMatrix::new(3, 4, 0i32).unwrap();
    assert_eq!(
        m.to_nested_vec(),
        vec![vec![0, 0, 0, 0], vec![0, 0, 0, 0], vec![0, 0, 0, 0]]
    );
    assert_eq!(m.shape(), (3, 4));
    assert_eq!(m.len(), 12);
}

#[test]
fn from_shape_vec_length_mismatch() {
    let err = FlatMatrix::from_shape_vec((2, 3), vec![1.0f32, 2.0]).unwrap_err();
    assert_eq!(
        err,
        MatrixError::ShapeMismatch {
            rows: 2,
            cols: 3,
            len: 2,
        }
    );
}

// ---------------------------------------------------------------------------
// get / set
// ---------------------------------------------------------------------------

#[test]
fn set_then_get_round_trips_everywhere() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut m = FlatMatrix::new(5, 7, 0.0f64).unwrap();
    for r in 0..5 {
        for c in 0..7 {
            let v: f64 = rng.gen_range(-1e6..1e6);
            m.set(r, c, v).unwrap();
            assert_eq!(m.get(r, c).unwrap(), v);
        }
    }
}

#[test]
fn set_out_of_range_writes_nothing() {
    let mut m = FlatMatrix::new(2, 2, 1u32).unwrap();
    assert!(m.set(2, 0, 9).is_err());
    assert!(m.set(0, 2, 9).is_err());
    assert!(m.iter().all(|&v| v == 1));
}

#[test]
fn indexing_matches_get() {
    let m = counting(3, 3);
    assert_eq!(m[(2, 1)], m.get(2, 1).unwrap());
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[test]
fn row_view_is_the_row() {
    let m = counting(3, 4);
    let row = m.row_view(1).unwrap();
    assert_eq!(row.to_vec(), vec![4, 5, 6, 7]);
    assert_eq!(row.as_slice(), Some(m.row(1).unwrap()));
    assert_eq!(row.offset(), 4);
    assert_eq!(row.stride(), 1);
}

#[test]
fn col_view_is_strided() {
    let m = counting(3, 4);
    let col = m.col_view(2).unwrap();
    assert_eq!(col.to_vec(), vec![2, 6, 10]);
    assert_eq!(col.stride(), 4);
    assert_eq!(col.len(), 3);
}

#[test]
fn view_out_of_range() {
    let mut m = counting(3, 4);
    assert_eq!(
        m.row_view(3).unwrap_err(),
        MatrixError::IndexOutOfRange {
            axis: Axis::Row,
            index: 3,
            bound: 3,
        }
    );
    assert_eq!(
        m.col_view(4).unwrap_err(),
        MatrixError::IndexOutOfRange {
            axis: Axis::Column,
            index: 4,
            bound: 4,
        }
    );
    assert!(m.row_view_mut(10).is_err());
    assert!(m.col_view_mut(10).is_err());
}

#[test]
fn writes_through_row_view_are_visible_in_matrix() {
    let mut m = FlatMatrix::new(3, 4, 0i64).unwrap();
    for r in 0..3 {
        let mut row = m.row_view_mut(r).unwrap();
        for c in 0..4 {
            row.set(c, (10 * r + c) as i64).unwrap();
        }
    }
    for r in 0..3 {
        for c in 0..4 {
            assert_eq!(m.get(r, c).unwrap(), (10 * r + c) as i64);
        }
    }
}

#[test]
fn writes_to_matrix_are_visible_in_row_view() {
    let mut m = FlatMatrix::new(2, 3, 0u8).unwrap();
    m.set(1, 2, 42).unwrap();
    let row = m.row_view(1).unwrap();
    assert_eq!(row[2], 42);
}

#[test]
fn writes_through_col_view_hit_strided_positions() {
    let mut m = FlatMatrix::new(3, 4, 0i32).unwrap();
    {
        let mut col = m.col_view_mut(1).unwrap();
        for (r, slot) in col.iter_mut().enumerate() {
            *slot = r as i32 + 1;
        }
    }
    assert_eq!(
        m.to_nested_vec(),
        vec![vec![0, 1, 0, 0], vec![0, 2, 0, 0], vec![0, 3, 0, 0]]
    );
    m.set(2, 1, -5).unwrap();
    assert_eq!(m.col_view(1).unwrap().to_vec(), vec![1, 2, -5]);
}

#[test]
fn col_view_fill() {
    let mut m = FlatMatrix::new(2, 2, 0.0f32).unwrap();
    m.col_view_mut(0).unwrap().fill(1.5);
    assert_eq!(m.as_slice(), &[1.5, 0.0, 1.5, 0.0]);
}

#[test]
fn views_alias_their_matrix() {
    let m = counting(3, 4);
    let row1 = m.row_view(1).unwrap();
    let row2 = m.row_view(2).unwrap();
    let col0 = m.col_view(0).unwrap();
    let col3 = m.col_view(3).unwrap();

    assert!(detect_aliasing(&row1, &m));
    assert!(detect_aliasing(&row1, &col0));
    assert!(detect_aliasing(&col3, &row2));
    assert!(!detect_aliasing(&row1, &row2));
    assert!(!detect_aliasing(&col0, &col3));
}

#[test]
fn distinct_columns_never_alias() {
    let m = FlatMatrix::new(6, 5, 0.0f64).unwrap();
    for a in 0..5 {
        for b in 0..5 {
            let (ca, cb) = (m.col_view(a).unwrap(), m.col_view(b).unwrap());
            assert_eq!(detect_aliasing(&ca, &cb), a == b, "columns {} and {}", a, b);
        }
    }
}

#[test]
fn every_row_crosses_every_column() {
    let m = FlatMatrix::new(4, 3, 0u16).unwrap();
    for r in 0..4 {
        for c in 0..3 {
            assert!(detect_aliasing(&m.row_view(r).unwrap(), &m.col_view(c).unwrap()));
        }
    }
}

#[test]
fn separate_matrices_do_not_alias() {
    let a = FlatMatrix::new(2, 2, 1i32).unwrap();
    let b = a.clone();
    assert_eq!(a, b);
    assert!(!detect_aliasing(&a, &b));
    assert!(!detect_aliasing(&a.row_view(0).unwrap(), &b.row_view(0).unwrap()));
}

// ---------------------------------------------------------------------------
// Export and iteration
// ---------------------------------------------------------------------------

#[test]
fn nested_export_is_a_copy() {
    let mut m = counting(2, 2);
    let mut nested = m.to_nested_vec();
    assert_eq!(nested, vec![vec![0, 1], vec![2, 3]]);
    nested[0][0] = 100;
    assert_eq!(m.get(0, 0).unwrap(), 0);
    m.set(1, 1, -1).unwrap();
    assert_eq!(nested[1][1], 3);
}

#[test]
fn iteration_is_row_major_and_restartable() {
    let m = counting(3, 4);
    let flattened: Vec<i32> = m.to_nested_vec().into_iter().flatten().collect();
    let first: Vec<i32> = m.iter().copied().collect();
    let second: Vec<i32> = (&m).into_iter().copied().collect();
    assert_eq!(first.len(), 12);
    assert_eq!(first, flattened);
    assert_eq!(first, second);
}

#[test]
fn rows_iter_yields_each_row() {
    let m = counting(2, 3);
    let rows: Vec<&[i32]> = m.rows_iter().collect();
    assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
}

#[test]
fn ndarray_export_matches() {
    let m = counting(2, 3);
    let arr = m.to_ndarray();
    assert_eq!(arr.shape(), &[2, 3]);
    assert_eq!(arr[[1, 2]], 5);
}
