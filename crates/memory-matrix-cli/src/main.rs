use anyhow::{Context, Result};
use log::LevelFilter;

use memory_matrix::{
    detect_aliasing, negate_ints_in_place, sum_even_indexed_bytes, FlatMatrix, MatrixConfig,
    StridedView,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default().filter_or("MEMORY_MATRIX_LOG", "error,memory_matrix=info"),
        )
        .init();

    demo_sum_even_bytes();
    demo_negate().context("negating sample integers")?;
    demo_alias()?;
    demo_matrix().context("building default matrix")?;
    demo_views().context("writing through views")?;

    log::info!("Demonstration finished");
    Ok(())
}

fn demo_sum_even_bytes() {
    let data: Vec<u8> = (0..10).collect();
    println!("Sum even bytes       : {}", sum_even_indexed_bytes(&data));
}

fn demo_negate() -> Result<()> {
    let mut ints = vec![1i32, -2, 3];
    negate_ints_in_place(&mut ints)?;
    println!("After negate         : {:?}", ints);
    Ok(())
}

fn demo_alias() -> Result<()> {
    let buf = b"hello".to_vec();
    let v1 = StridedView::contiguous(&buf);
    let v2 = StridedView::new(&buf, 1, 1, buf.len() - 1)?;
    println!("Alias detect         : {}", detect_aliasing(&v1, &v2));

    let other = b"hello".to_vec();
    println!(
        "Alias detect (copy)  : {}",
        detect_aliasing(&v1, &StridedView::contiguous(&other))
    );
    Ok(())
}

fn demo_matrix() -> Result<()> {
    let m = MatrixConfig::default().build()?;
    println!("Matrix repr          : {}", m);
    println!("Matrix tolist        : {:?}", m.to_nested_f64());
    Ok(())
}

fn demo_views() -> Result<()> {
    let mut m = FlatMatrix::new(3, 4, 0i32)?;
    m.row_view_mut(1)?.fill(7);
    m.col_view_mut(2)?.set(0, -1)?;
    println!("Views written        : {:?}", m.to_nested_vec());

    let (row, col) = (m.row_view(1)?, m.col_view(2)?);
    println!("Row 1 / column 2     : {:?} / {:?}", row.to_vec(), col.to_vec());
    println!("Row/column alias     : {}", detect_aliasing(&row, &col));
    Ok(())
}
