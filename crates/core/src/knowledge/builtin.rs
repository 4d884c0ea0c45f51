use crate::analyzer::{AnalyzerEntry, AnalyzerResult, DietAdvice, Exercise};
use crate::recommendation::{
    ConditionRule, DietItem, Medication, Recommendation, WorkoutItem,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn med(name: &str, dosage: &str, frequency: &str, notes: &str) -> Medication {
    Medication {
        name: name.to_owned(),
        dosage: dosage.to_owned(),
        frequency: frequency.to_owned(),
        notes: Some(notes.to_owned()),
    }
}

fn exercise(kind: &str, duration: &str, frequency: &str, notes: &str) -> Exercise {
    Exercise {
        kind: kind.to_owned(),
        duration: duration.to_owned(),
        frequency: frequency.to_owned(),
        notes: notes.to_owned(),
    }
}

fn meal(meal: &str, description: &str) -> DietItem {
    DietItem {
        meal: meal.to_owned(),
        description: description.to_owned(),
    }
}

fn workout(
    name: &str,
    duration: &str,
    frequency: &str,
    description: &str,
) -> WorkoutItem {
    WorkoutItem {
        name: name.to_owned(),
        duration: duration.to_owned(),
        frequency: frequency.to_owned(),
        description: description.to_owned(),
    }
}

fn diet(suggestions: &[&str], avoid: &[&str]) -> Option<DietAdvice> {
    Some(DietAdvice {
        suggestions: strings(suggestions),
        avoid: strings(avoid),
    })
}

pub(super) fn analyzer_entries() -> Vec<AnalyzerEntry> {
    vec![
        AnalyzerEntry {
            keyword: "headache".to_owned(),
            response: AnalyzerResult {
                analysis: "Headaches can have many causes ranging from stress \
                    and dehydration to more serious conditions. Based on your \
                    description, this sounds like it might be a tension \
                    headache or possibly a migraine."
                    .to_owned(),
                possible_conditions: strings(&[
                    "Tension headache",
                    "Migraine",
                    "Dehydration",
                    "Eye strain",
                    "Sinus infection",
                ]),
                recommendations: strings(&[
                    "Rest in a quiet, dark room",
                    "Stay hydrated",
                    "Try over-the-counter pain relievers if appropriate",
                    "Apply a cold or warm compress",
                    "Practice relaxation techniques",
                ]),
                should_consult_doctor: false,
                medications: Some(vec![
                    med(
                        "Acetaminophen",
                        "500-1000mg",
                        "Every 4-6 hours as needed",
                        "Do not exceed 4000mg per day",
                    ),
                    med(
                        "Ibuprofen",
                        "200-400mg",
                        "Every 4-6 hours with food",
                        "Avoid if you have stomach ulcers",
                    ),
                ]),
                diet: diet(
                    &[
                        "Magnesium-rich foods",
                        "Water (at least 8 glasses per day)",
                        "Ginger tea",
                    ],
                    &[
                        "Caffeine",
                        "Alcohol",
                        "Processed foods",
                        "Foods with MSG or nitrates",
                    ],
                ),
                workout: Some(vec![
                    exercise(
                        "Neck stretches",
                        "5-10 minutes",
                        "2-3 times daily",
                        "Gentle stretching to relieve tension",
                    ),
                    exercise(
                        "Walking",
                        "20-30 minutes",
                        "Daily",
                        "Light aerobic exercise can help reduce stress",
                    ),
                ]),
            },
        },
        AnalyzerEntry {
            keyword: "fever".to_owned(),
            response: AnalyzerResult {
                analysis: "Fever is often a sign that your body is fighting an \
                    infection. The severity and duration are important factors \
                    to consider. Based on your description, this could be a \
                    viral infection like the flu."
                    .to_owned(),
                possible_conditions: strings(&[
                    "Common cold",
                    "Flu",
                    "COVID-19",
                    "Urinary tract infection",
                    "Strep throat",
                ]),
                recommendations: strings(&[
                    "Rest and stay hydrated",
                    "Take acetaminophen or ibuprofen as directed to reduce fever",
                    "Monitor temperature regularly",
                    "Use light clothing and bedding",
                    "Take lukewarm baths if fever is high",
                ]),
                should_consult_doctor: true,
                medications: Some(vec![
                    med(
                        "Acetaminophen",
                        "500-1000mg",
                        "Every 4-6 hours as needed",
                        "For fever reduction",
                    ),
                    med(
                        "Ibuprofen",
                        "200-400mg",
                        "Every 4-6 hours with food",
                        "Alternate with acetaminophen if needed",
                    ),
                ]),
                diet: diet(
                    &[
                        "Clear broths",
                        "Water",
                        "Electrolyte drinks",
                        "Easy to digest foods when appetite returns",
                    ],
                    &["Heavy, greasy foods", "Alcohol", "Caffeine"],
                ),
                workout: Some(vec![
                    exercise(
                        "Rest",
                        "As needed",
                        "Until fever resolves",
                        "Avoid exercise while feverish",
                    ),
                    exercise(
                        "Light stretching",
                        "5 minutes",
                        "As tolerated when fever is gone",
                        "Ease back into activity gradually",
                    ),
                ]),
            },
        },
        AnalyzerEntry {
            keyword: "cough".to_owned(),
            response: AnalyzerResult {
                analysis: "A cough can be caused by various conditions \
                    affecting your respiratory system. Based on your \
                    description, this sounds like it could be an upper \
                    respiratory infection or possibly allergies."
                    .to_owned(),
                possible_conditions: strings(&[
                    "Common cold",
                    "Allergies",
                    "Bronchitis",
                    "Asthma",
                    "Post-nasal drip",
                ]),
                recommendations: strings(&[
                    "Stay hydrated",
                    "Use a humidifier",
                    "Try honey for soothing (if over 1 year old)",
                    "Avoid irritants like smoke",
                    "Use cough drops for temporary relief",
                ]),
                should_consult_doctor: false,
                medications: Some(vec![
                    med(
                        "Dextromethorphan",
                        "As directed on package",
                        "Every 6-8 hours",
                        "Cough suppressant for dry cough",
                    ),
                    med(
                        "Guaifenesin",
                        "As directed on package",
                        "Every 4 hours",
                        "Expectorant for productive cough",
                    ),
                ]),
                diet: diet(
                    &[
                        "Warm tea with honey",
                        "Chicken soup",
                        "Clear fluids",
                        "Ginger tea",
                    ],
                    &[
                        "Dairy products (can increase mucus production)",
                        "Cold drinks",
                    ],
                ),
                workout: Some(vec![
                    exercise(
                        "Deep breathing",
                        "5 minutes",
                        "Several times daily",
                        "Helps clear airways",
                    ),
                    exercise(
                        "Walking",
                        "10-15 minutes",
                        "If feeling up to it",
                        "Light exercise if not feeling short of breath",
                    ),
                ]),
            },
        },
        AnalyzerEntry {
            keyword: "chest pain".to_owned(),
            response: AnalyzerResult {
                analysis: "Chest pain can be caused by various conditions, \
                    from minor issues to serious medical emergencies. It's \
                    important to take chest pain seriously. Based on your \
                    description, this requires immediate medical attention."
                    .to_owned(),
                possible_conditions: strings(&[
                    "Muscle strain",
                    "Anxiety or panic attack",
                    "Acid reflux",
                    "Angina",
                    "Myocardial infarction (heart attack)",
                ]),
                recommendations: strings(&[
                    "If severe, sudden, or accompanied by shortness of breath, \
                     seek emergency medical attention immediately",
                    "Do not drive yourself to the hospital",
                    "Chew an aspirin if advised by emergency services and not \
                     allergic",
                ]),
                should_consult_doctor: true,
                medications: Some(vec![med(
                    "Aspirin",
                    "325mg",
                    "Once (in emergency if advised)",
                    "Only if directed by healthcare provider",
                )]),
                diet: diet(
                    &[
                        "Heart-healthy diet if chronic",
                        "Low-sodium foods",
                        "Fruits and vegetables",
                    ],
                    &["Fatty foods", "Excessive alcohol", "Caffeine"],
                ),
                workout: Some(vec![exercise(
                    "Rest",
                    "Until evaluated by doctor",
                    "N/A",
                    "Avoid exercise until cleared by healthcare provider",
                )]),
            },
        },
        AnalyzerEntry {
            keyword: "stomach pain".to_owned(),
            response: AnalyzerResult {
                analysis: "Abdominal pain can be caused by many conditions, \
                    from temporary digestive issues to more serious problems. \
                    Based on your description, this could be indigestion or \
                    possibly a mild stomach virus."
                    .to_owned(),
                possible_conditions: strings(&[
                    "Indigestion",
                    "Gas or bloating",
                    "Constipation",
                    "Stomach virus",
                    "Food poisoning",
                    "Appendicitis",
                ]),
                recommendations: strings(&[
                    "Try to rest and avoid solid foods temporarily",
                    "Stay hydrated",
                    "Use a heating pad for comfort",
                    "Try over-the-counter antacids if appropriate",
                    "Monitor for worsening symptoms",
                ]),
                should_consult_doctor: false,
                medications: Some(vec![
                    med(
                        "Antacid",
                        "As directed on package",
                        "After meals and at bedtime",
                        "For heartburn or indigestion",
                    ),
                    med(
                        "Bismuth subsalicylate",
                        "As directed on package",
                        "Every 4 hours",
                        "For diarrhea or upset stomach",
                    ),
                ]),
                diet: diet(
                    &[
                        "BRAT diet (bananas, rice, applesauce, toast)",
                        "Clear broths",
                        "Ginger ale or ginger tea",
                    ],
                    &[
                        "Spicy foods",
                        "Fatty foods",
                        "Dairy",
                        "Caffeine",
                        "Alcohol",
                    ],
                ),
                workout: Some(vec![
                    exercise(
                        "Rest",
                        "Until symptoms improve",
                        "N/A",
                        "Avoid exercise during acute symptoms",
                    ),
                    exercise(
                        "Walking",
                        "10 minutes",
                        "After feeling better",
                        "Gentle movement can help digestive system",
                    ),
                ]),
            },
        },
    ]
}

pub(super) fn fallback() -> AnalyzerResult {
    AnalyzerResult {
        analysis: "Based on the symptoms you've described, I don't have enough \
            information to provide specific guidance. It's always best to \
            consult with a healthcare professional for a proper diagnosis."
            .to_owned(),
        possible_conditions: vec![],
        recommendations: strings(&[
            "Keep track of your symptoms and when they occur",
            "Note any factors that seem to worsen or improve your condition",
            "Consider consulting with a healthcare provider for proper \
             evaluation",
        ]),
        should_consult_doctor: true,
        medications: None,
        diet: None,
        workout: None,
    }
}

pub(super) fn condition_rules() -> Vec<ConditionRule> {
    vec![
        ConditionRule {
            triggers: strings(&["headache"]),
            recommendation: Recommendation {
                condition: "Headache Relief".to_owned(),
                medications: vec![
                    med(
                        "Acetaminophen",
                        "500-1000mg",
                        "Every 4-6 hours as needed",
                        "Do not exceed 4000mg per day",
                    ),
                    med(
                        "Ibuprofen",
                        "200-400mg",
                        "Every 4-6 hours with food",
                        "Avoid if you have stomach ulcers",
                    ),
                ],
                diet: vec![
                    meal("General", "Stay hydrated with 8-10 glasses of water daily"),
                    meal(
                        "Foods to include",
                        "Magnesium-rich foods (spinach, nuts, seeds), Omega-3 \
                         fatty acids (fish)",
                    ),
                    meal(
                        "Foods to avoid",
                        "Caffeine, alcohol, aged cheeses, processed meats \
                         (potential triggers)",
                    ),
                ],
                workout: vec![
                    workout(
                        "Gentle Stretching",
                        "5-10 minutes",
                        "As needed during headache",
                        "Focus on neck and shoulder stretches",
                    ),
                    workout(
                        "Regular Exercise",
                        "30 minutes",
                        "5 times per week",
                        "Moderate aerobic activity like walking or swimming",
                    ),
                ],
            },
        },
        ConditionRule {
            triggers: strings(&["fever", "flu"]),
            recommendation: Recommendation {
                condition: "Fever & Flu Care".to_owned(),
                medications: vec![
                    med(
                        "Acetaminophen",
                        "500-1000mg",
                        "Every 4-6 hours as needed",
                        "For fever reduction",
                    ),
                    med(
                        "Decongestant",
                        "As directed",
                        "As needed",
                        "For nasal congestion",
                    ),
                ],
                diet: vec![
                    meal(
                        "Fluids",
                        "Clear broths, water, electrolyte drinks to prevent \
                         dehydration",
                    ),
                    meal(
                        "Light Foods",
                        "Toast, rice, bananas, applesauce when appetite returns",
                    ),
                    meal(
                        "Vitamins",
                        "Vitamin C rich foods like citrus fruits and leafy greens",
                    ),
                ],
                workout: vec![
                    workout(
                        "Rest",
                        "As much as possible",
                        "During acute illness",
                        "Allow your body to heal",
                    ),
                    workout(
                        "Light Movement",
                        "5-10 minutes",
                        "When feeling better",
                        "Gentle stretching or short walks inside",
                    ),
                ],
            },
        },
        ConditionRule {
            triggers: strings(&["cough"]),
            recommendation: Recommendation {
                condition: "Cough Management".to_owned(),
                medications: vec![
                    med(
                        "Dextromethorphan",
                        "As directed on package",
                        "Every 6-8 hours",
                        "Cough suppressant for dry cough",
                    ),
                    med(
                        "Guaifenesin",
                        "As directed on package",
                        "Every 4 hours",
                        "Expectorant for productive cough",
                    ),
                ],
                diet: vec![
                    meal(
                        "Fluids",
                        "Warm tea with honey (if over 1 year old), clear \
                         broths, water",
                    ),
                    meal(
                        "Soothing Foods",
                        "Smooth foods like yogurt, applesauce, warm soup",
                    ),
                ],
                workout: vec![
                    workout(
                        "Breathing Exercises",
                        "5 minutes",
                        "3-4 times daily",
                        "Deep breathing to clear airways",
                    ),
                    workout(
                        "Rest",
                        "As needed",
                        "Until cough improves",
                        "Avoid strenuous exercise",
                    ),
                ],
            },
        },
        ConditionRule {
            triggers: strings(&["stomach", "digestive"]),
            recommendation: Recommendation {
                condition: "Digestive Health".to_owned(),
                medications: vec![
                    med(
                        "Antacids",
                        "As directed",
                        "After meals and at bedtime",
                        "For heartburn or indigestion",
                    ),
                    med("Probiotics", "1 capsule", "Daily", "For gut health support"),
                ],
                diet: vec![
                    meal(
                        "BRAT Diet",
                        "Bananas, Rice, Applesauce, Toast for upset stomach",
                    ),
                    meal(
                        "Hydration",
                        "Clear liquids, herbal teas, electrolyte solutions",
                    ),
                    meal(
                        "Foods to Avoid",
                        "Spicy, fatty, acidic foods, caffeine, alcohol",
                    ),
                ],
                workout: vec![
                    workout(
                        "Walking",
                        "15-20 minutes",
                        "Daily",
                        "Aids digestion after meals",
                    ),
                    workout(
                        "Core Strengthening",
                        "10 minutes",
                        "3 times weekly",
                        "Gentle exercises for abdominal muscles",
                    ),
                ],
            },
        },
    ]
}
