use anyhow::{Context, Result};
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const SUBJECTS: &[&str] = &[
    "Mathematics for Computing",
    "Software Engineering",
    "Database Systems",
    "Computer Networks",
    "Operating Systems",
    "Data Structures and Algorithms",
    "Human Computer Interaction",
    "Information Security",
    "Distributed Systems",
    "Machine Learning",
    "Cloud Computing",
    "Research Methods",
];

const UNGROUPED: &[&str] = &[
    "Student Notices",
    "Library Orientation",
    "Extra Curricular Activities",
    "Career Guidance Unit",
];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_modules.json".to_string());
    let mut rng = SimpleRng::new(42);

    // Terms: four years, two semesters each, starting 2021 Y1.S1.
    let mut modules = Vec::new();
    let mut next_id: u64 = 1000;
    for year in 1..=4u32 {
        for semester in 1..=2u32 {
            let calendar_year = 2020 + year;
            let count = 3 + (rng.next_u64() % 3) as usize;
            for _ in 0..count {
                let subject = rng.pick(SUBJECTS);
                modules.push(json!({
                    "id": next_id.to_string(),
                    "name": format!("{calendar_year} - Y{year}.S{semester} - {subject}"),
                }));
                next_id += 1;
            }
        }
    }
    for name in UNGROUPED {
        modules.push(json!({ "id": next_id.to_string(), "name": name }));
        next_id += 1;
    }

    let count = modules.len();
    let text = serde_json::to_string_pretty(&json!({ "modules": modules }))
        .context("serialising catalog")?;
    std::fs::write(&output_path, text)
        .with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {count} modules to {output_path}");
    Ok(())
}
