use packetcraft::{
    encode::encode_hex,
    eval::evaluate,
    hex::decode_hex,
    packet::{LengthType, Operator, Packet},
    parser::parse,
};
use criterion::{Criterion, criterion_group, criterion_main};

/// Balanced tree of sums over `width` literals per level, `depth` levels deep.
fn gen_packet(width: usize, depth: usize) -> Packet {
    if depth == 0 {
        return Packet::literal(1, 0x0FED_CBA9);
    }

    let children = (0..width).map(|_| gen_packet(width, depth - 1)).collect();
    let length_type = if depth % 2 == 0 {
        LengthType::TotalBits
    } else {
        LengthType::PacketCount
    };

    Packet::operator(2, Operator::Sum, length_type, children)
}

fn bench_decode(c: &mut Criterion) {
    for &(width, depth) in &[(2usize, 1usize), (4, 3), (8, 3)] {
        let hex = encode_hex(&gen_packet(width, depth)).unwrap();

        c.bench_function(&format!("decode_{}x{}", width, depth), |b| {
            b.iter(|| {
                let bits = decode_hex(&hex).unwrap();
                let _ = parse(&bits).unwrap();
            })
        });
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let packet = gen_packet(8, 3);

    c.bench_function("evaluate_8x3", |b| {
        b.iter(|| {
            let _ = evaluate(&packet).unwrap();
        })
    });
}

criterion_group!(benches, bench_decode, bench_evaluate);
criterion_main!(benches);
