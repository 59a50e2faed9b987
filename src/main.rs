use lexi_trees::lexi::{D2Map, D3Map, PLMap};

fn main() {
    println!("\x1b[1;34mD2Map (2-Lexi Tree):\x1b[0m");
    demo_d2();
    println!();

    println!("\x1b[1;34mD3Map (3-Lexi Tree):\x1b[0m");
    demo_d3();
    println!();

    println!("\x1b[1;34mPLMap (P-Lexi Tree):\x1b[0m");
    demo_plexi();
    println!();
}

fn demo_d2() {
    let mut map = D2Map::new(0, "sentinel");
    for i in [5, 3, 8, 1, 4, 7, 9, 2, 6, 0] {
        map.set(i, i * i);
    }
    map.check();
    println!("height: {}", map.height());
    let entries: Vec<_> = map.iter().collect();
    println!("in-order: {:?}", entries);

    map.remove(&5).expect("5 was just inserted");
    map.check();
    println!("after removing 5: contains(5) = {}", map.contains(&5));
}

fn demo_d3() {
    let mut map = D3Map::new(0, "sentinel");
    for i in 0..20 {
        map.set(i, i.to_string());
    }
    map.check();
    println!("height: {}, len: {}", map.height(), map.len());

    for i in (0..20).step_by(3) {
        map.remove_or(&i, "missing".to_string());
    }
    map.check();
    println!("len after removals: {}", map.len());
}

fn demo_plexi() {
    let mut map = PLMap::with_default_p(0, "sentinel");
    for i in 0..30 {
        map.set(i, i);
    }
    map.check();
    println!("height: {} (probabilistic)", map.height());

    let (nodes, edges) = map.graph();
    println!("graph: {} nodes, {} edges", nodes.len(), edges.len());
}
