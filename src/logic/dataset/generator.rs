//! Synthetic personnel generator
//!
//! Seeded, so the same `(count, seed)` always yields the same dataset,
//! including the stochastic attrition labels.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::logic::features::BaseFeatures;
use crate::logic::personnel::{LeadershipPotential, PersonnelRecord, Rank, SKILL_CATALOGUE};
use crate::logic::scoring::formulas::{attrition_label, attrition_risk_points, readiness_score};

const BRANCHES: &[&str] = &["Flying", "Technical", "Ground Duty", "Medical", "Administration"];
const UNITS: &[&str] = &[
    "1 Squadron", "2 Squadron", "3 Squadron", "4 Squadron", "5 Squadron",
    "6 Squadron", "7 Squadron", "8 Squadron", "9 Squadron", "10 Squadron",
];
const GENDERS: &[&str] = &["Male", "Female"];
const FAMILY_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];
const EDUCATION_LEVELS: &[&str] = &["Graduate", "Post Graduate", "Doctorate"];
const DEPLOYMENT_STATUSES: &[&str] = &["Home Base", "Deployed", "Training", "On Leave"];
const CLEARANCES: &[&str] = &["Confidential", "Secret", "Top Secret"];
const PERFORMANCE_RATINGS: &[&str] = &["Outstanding", "Very Good", "Good", "Average"];
const FIRST_NAMES: &[&str] = &[
    "Rajesh", "Priya", "Amit", "Sunita", "Vikram", "Kavita", "Suresh", "Meera", "Ravi", "Anita",
];
const LAST_NAMES: &[&str] = &["Sharma", "Patel", "Singh", "Kumar", "Gupta", "Yadav", "Verma", "Jain"];

/// Leadership label from the scores
pub fn leadership_label(leadership_score: f64, peer_review_score: f64) -> LeadershipPotential {
    if leadership_score >= 8.0 && peer_review_score >= 8.0 {
        LeadershipPotential::High
    } else if leadership_score >= 6.0 {
        LeadershipPotential::Medium
    } else {
        LeadershipPotential::Low
    }
}

pub struct SyntheticGenerator {
    rng: StdRng,
    next_index: usize,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_index: 0,
        }
    }

    fn pick(&mut self, values: &[&'static str]) -> String {
        values.choose(&mut self.rng).copied().unwrap_or_default().to_string()
    }

    pub fn next_record(&mut self) -> PersonnelRecord {
        self.next_index += 1;
        let i = self.next_index;

        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let mut r = PersonnelRecord::new(format!("IAF_{:06}", i), format!("{} {}", first, last));

        let yos: u32 = self.rng.gen_range(1..=30);
        let level = (yos / 3 + self.rng.gen_range(0..=1)).clamp(1, 10) as u8;
        r.rank = Rank::from_level(level);
        r.years_of_service = Some(f64::from(yos));
        r.age = Some(f64::from(22 + yos) + f64::from(self.rng.gen_range(-2i32..=5)));

        r.branch = Some(self.pick(BRANCHES));
        r.unit = Some(self.pick(UNITS));
        r.gender = Some(self.pick(GENDERS));
        r.family_status = Some(self.pick(FAMILY_STATUSES));
        r.education_level = Some(self.pick(EDUCATION_LEVELS));
        r.deployment_status = Some(self.pick(DEPLOYMENT_STATUSES));
        r.security_clearance = Some(self.pick(CLEARANCES));
        r.performance_rating = Some(self.pick(PERFORMANCE_RATINGS));

        r.fitness_score = Some(f64::from(self.rng.gen_range(60u32..=100)));
        r.stress_index = Some(f64::from(self.rng.gen_range(10u32..=80)));
        let msr: f64 = self.rng.gen_range(0.7..=1.0);
        r.mission_success_rate = Some((msr * 100.0).round() / 100.0);
        r.engagement_score = Some(f64::from(self.rng.gen_range(40u32..=100)));
        r.disciplinary_actions = Some(f64::from(self.rng.gen_range(0u32..=3)));
        r.leadership_score = Some(f64::from(self.rng.gen_range(3u32..=10)));
        r.peer_review_score = Some(f64::from(self.rng.gen_range(5u32..=10)));
        r.missions_participated = Some(f64::from(self.rng.gen_range(5u32..=100)));
        r.leave_records = Some(f64::from(self.rng.gen_range(15u32..=45)));
        r.complaints = Some(f64::from(self.rng.gen_range(0u32..=2)));
        r.salary_grade = Some(f64::from(level));

        let skill_count = self.rng.gen_range(1..=3);
        r.skills = SKILL_CATALOGUE
            .choose_multiple(&mut self.rng, skill_count)
            .collect();

        label(&mut r, self.rng.gen::<f64>());
        r
    }

    pub fn generate(&mut self, count: usize) -> Vec<PersonnelRecord> {
        (0..count).map(|_| self.next_record()).collect()
    }
}

/// Attach ground-truth labels; `draw` is the independent attrition draw
pub fn label(record: &mut PersonnelRecord, draw: f64) {
    let base = BaseFeatures::resolve(record);
    record.readiness_score = Some(readiness_score(&base));
    record.leadership_potential = Some(leadership_label(base.leadership_score, base.peer_review_score));
    record.attrition_risk = Some(attrition_label(attrition_risk_points(&base), draw));
}

/// `count` labelled records from `seed`
pub fn generate(count: usize, seed: u64) -> Vec<PersonnelRecord> {
    let records = SyntheticGenerator::new(seed).generate(count);
    let at_risk = records.iter().filter(|r| r.attrition_risk == Some(true)).count();
    log::info!(
        "Generated {} synthetic records (seed {}, {} at attrition risk)",
        records.len(),
        seed,
        at_risk
    );
    records
}
