//! Diesel table definitions, kept in step with `schema.rs`

diesel::table! {
    survey_results (id) {
        id -> Text,
        user_id -> Text,
        answers -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    compass_data (id) {
        id -> Text,
        user_id -> Text,
        survey_id -> Text,
        clarity_score -> Integer,
        narrative_text -> Text,
        energy_pattern -> Text,
        learning_style -> Text,
        recommended_skills -> Text,
        growth_edges -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    skill_progress (id) {
        id -> Text,
        user_id -> Text,
        skill_id -> Text,
        current_day -> Integer,
        completed_days -> Text,
        reflections -> Text,
        status -> Text,
        completed_at -> Nullable<Text>,
        survey_response -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    journal_entries (id) {
        id -> Text,
        user_id -> Text,
        content -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    user_settings (user_id) {
        user_id -> Text,
        email_notifications -> Bool,
        reflection_reminders -> Bool,
        updated_at -> Text,
    }
}

diesel::joinable!(compass_data -> survey_results (survey_id));

diesel::allow_tables_to_appear_in_same_query!(
    survey_results,
    compass_data,
    skill_progress,
    journal_entries,
    user_settings,
);
