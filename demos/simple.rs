use sparse_hungarian::{munkres, OutputFields};

fn main() -> sparse_hungarian::Result<()> {
    env_logger::init();

    // worker 12 can only take job 7; worker 40 can take either
    let entries = [(40, 7, 3.), (40, 9, 1.), (12, 7, 2.), (99, 9, 5.)];
    let allocations = munkres(&entries)?;

    let fields = OutputFields::default().with_cost().with_original_index();
    for tuple in allocations.tuples(fields) {
        println!("{tuple:?}");
    }
    println!("total: {}", allocations.total_cost());
    Ok(())
}
