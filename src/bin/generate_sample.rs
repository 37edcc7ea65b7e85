use std::path::PathBuf;

use anyhow::{Context, Result};

const CLASSES: [&str; 5] = [
    "correct",
    "partially_correct_incomplete",
    "contradictory",
    "irrelevant",
    "non_domain",
];

/// (question id, question, reference answer, candidate student answers)
const QUESTIONS: [(&str, &str, &str, [&str; 4]); 3] = [
    (
        "EM_1",
        "What happens to a bulb when the switch is open?",
        "The bulb is off because the circuit is not closed.",
        [
            "The bulb goes out since there is a gap in the circuit.",
            "It stays on.",
            "The battery gets hot & dies.",
            "I don't know.",
        ],
    ),
    (
        "EM_2",
        "Why does bulb A stay on when bulb B burns out?",
        "Bulb A is still in a closed path with the battery.",
        [
            "A is on its own closed path.",
            "Because the circuit is parallel.",
            "Bulb A is broken too.",
            "Electricity < magic.",
        ],
    ),
    (
        "SE_7",
        "Explain why the voltage reading is 0 across the terminals.",
        "The terminals are connected to each other, so there is no gap.",
        [
            "There is no gap between the terminals.",
            "The voltmeter is connected to the same side.",
            "The battery is dead.",
            "Voltage is always 0.",
        ],
    ),
];

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn render_question(
    rng: &mut SimpleRng,
    id: &str,
    question: &str,
    reference: &str,
    candidates: &[&str],
    answers_per_question: usize,
) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<question id=\"{id}\" module=\"sample\">\n"));
    xml.push_str(&format!("  <questionText>{}</questionText>\n", escape_xml(question)));
    xml.push_str("  <referenceAnswers>\n");
    xml.push_str(&format!(
        "    <referenceAnswer id=\"{id}-a1\" category=\"BEST\">{}</referenceAnswer>\n",
        escape_xml(reference)
    ));
    xml.push_str("  </referenceAnswers>\n");
    xml.push_str("  <studentAnswers>\n");
    for n in 0..answers_per_question {
        let sentence = rng.pick(candidates);
        let class = rng.pick(&CLASSES);
        xml.push_str(&format!(
            "    <studentAnswer id=\"{id}.s{n}\" accuracy=\"{class}\">{}</studentAnswer>\n",
            escape_xml(sentence)
        ));
    }
    xml.push_str("  </studentAnswers>\n");
    xml.push_str("</question>\n");
    xml
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_dataset".to_string()),
    );
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let answers_per_question = 8;

    for (id, question, reference, candidates) in &QUESTIONS {
        let xml = render_question(
            &mut rng,
            id,
            question,
            reference,
            candidates,
            answers_per_question,
        );
        let path = out_dir.join(format!("{id}.xml"));
        std::fs::write(&path, xml).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
    }

    println!(
        "Wrote {} questions ({answers_per_question} student answers each) to {}",
        QUESTIONS.len(),
        out_dir.display()
    );
    Ok(())
}
