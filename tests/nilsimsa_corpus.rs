//! End-to-end runs over a synthesized spam corpus and the built-in Nilsimsa
//! adapter.
//!
//! The corpus generator fills three spam templates with randomly picked
//! recipient/sender names and amounts, driven by an injectable seed so every
//! run sees the same texts.

use dupeprob::{Batch, NilsimsaHasher, ScorerConfig};

const TEMPLATES: [&str; 3] = [
    "Dear {recipient} This is to inform you that after the meeting with The Federal \
     Government Board Of Directors, we have concluded that you should be paid {amount} \
     to make up for your losses in the past and also retrieve the good image of our \
     federation that has been tarnished by hacker and scammers. Therefore you are \
     hereby advised to get back to us without delay. Thanks Mr {sender}",
    "Dear {recipient}, My name is Mr. {sender} II bank of Africa manager in Benin \
     Republic, The United Nations instruct us to contact you via your email and make \
     sure that your ATM VISA CARD worth {amount} is delivered to you through DHL, we \
     wish to inform you that your ATM card will expire in a few day's time if you do \
     not use your pin before Next month, contact us with your mailing address and \
     telephone number immediately of your ATM CARD, Thanks for banking with us \
     Sincerely {sender}",
    "Hello {recipient}, I'm {sender}, a business tycoon, investor, and philanthropist, \
     the vice chairman, chief executive officer (CEO), and the single largest \
     shareholder of Walgreens Boots Alliance. I gave away 25 percent of my personal \
     wealth to charity. And I also pledged to give away the rest of 25% this year to \
     Individuals. I have decided to donate {amount} to you. If you are interested in \
     my donation, do contact me for more info. Warm Regard CEO Walgreens Boots \
     Alliance {sender}",
];

const RECIPIENTS: [&str; 10] = [
    "Alice Johnson",
    "Bob Smith",
    "Carol Danvers",
    "David Okafor",
    "Elena Petrova",
    "Farid Hassan",
    "Grace Kim",
    "Hugo Martinez",
    "Ingrid Larsen",
    "Jamal Wright",
];

const SENDERS: [&str; 10] = [
    "Anderson Cole",
    "Benedict Ouma",
    "Charles Danko",
    "Dominic Fuller",
    "Edward Banks",
    "Francis Adeyemi",
    "Gerald Mensah",
    "Howard Lane",
    "Isaac Boateng",
    "Jonas Weber",
];

/// Fill one template deterministically from the rng state.
fn fill(template: &str, rng: &mut fastrand::Rng) -> String {
    let recipient = RECIPIENTS[rng.usize(..RECIPIENTS.len())];
    let sender = SENDERS[rng.usize(..SENDERS.len())];
    let amount = format!("${},000,000", rng.u32(10..50));
    template
        .replace("{recipient}", recipient)
        .replace("{sender}", sender)
        .replace("{amount}", &amount)
}

/// 50 spam texts: 30 from the first template, 10 each from the other two,
/// mirroring a 60/20/20 batch mix.
fn spam_corpus(seed: u64) -> Vec<String> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..50)
        .map(|i| {
            let template = if i < 30 {
                TEMPLATES[0]
            } else if i < 40 {
                TEMPLATES[1]
            } else {
                TEMPLATES[2]
            };
            fill(template, &mut rng)
        })
        .collect()
}

#[test]
fn corpus_generation_is_seed_stable() {
    assert_eq!(spam_corpus(7), spam_corpus(7));
    assert_ne!(spam_corpus(7), spam_corpus(8));
}

#[test]
fn corpus_probabilities_stay_in_unit_interval() {
    let texts = spam_corpus(42);
    let batch = Batch::compute(&texts, &NilsimsaHasher::new(), &ScorerConfig::default())
        .expect("batch");
    assert_eq!(batch.len(), 50);
    assert!(batch
        .probabilities()
        .iter()
        .all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn repeated_runs_are_bit_identical() {
    let texts = spam_corpus(42);
    let cfg = ScorerConfig::default();
    let hasher = NilsimsaHasher::new();
    let a = Batch::compute(&texts, &hasher, &cfg).expect("batch");
    let b = Batch::compute(&texts, &hasher, &cfg).expect("batch");
    assert_eq!(a.probabilities(), b.probabilities());
    assert_eq!(a.hashes(), b.hashes());
}

#[test]
fn exact_duplicates_pick_each_other_up() {
    // Two byte-identical texts rebase to max_possible against each other,
    // which clears any cutoff fraction <= 1 as long as the batch has spread.
    let mut texts = spam_corpus(42);
    let dup = "URGENT: confirm your lottery winnings of $25,000,000 today".to_string();
    texts.push(dup.clone());
    texts.push(dup);
    let n = texts.len();

    let batch = Batch::compute(&texts, &NilsimsaHasher::new(), &ScorerConfig::default())
        .expect("batch");
    assert!(batch.max_possible() > 0, "template corpus must have spread");

    let floor = 1.0 / (n - 1) as f64;
    assert!(batch.probability(n - 1).unwrap() >= floor);
    assert!(batch.probability(n - 2).unwrap() >= floor);
}

#[test]
fn reversing_the_corpus_reverses_the_probabilities() {
    let texts = spam_corpus(42);
    let cfg = ScorerConfig::default();
    let hasher = NilsimsaHasher::new();
    let forward = Batch::compute(&texts, &hasher, &cfg).expect("batch");

    let reversed: Vec<String> = texts.into_iter().rev().collect();
    let backward = Batch::compute(&reversed, &hasher, &cfg).expect("batch");

    let mut flipped = backward.probabilities().to_vec();
    flipped.reverse();
    assert_eq!(forward.probabilities(), flipped.as_slice());
}

#[test]
fn parallel_corpus_run_matches_sequential() {
    let texts = spam_corpus(42);
    let hasher = NilsimsaHasher::new();
    let seq = Batch::compute(&texts, &hasher, &ScorerConfig::default()).expect("batch");
    let par = Batch::compute(&texts, &hasher, &ScorerConfig::new().with_parallel(true))
        .expect("batch");
    assert_eq!(seq.probabilities(), par.probabilities());
}
