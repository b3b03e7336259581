use super::RiddleRequest;

/// System prompt sent to the chat model for one riddle.
#[must_use]
pub fn build_prompt(request: &RiddleRequest) -> String {
    let position = request.key.attempt().saturating_add(1);
    let total = request.key.total_levels();
    format!(
        "You are a riddle generator for a quiz game. This is riddle {position} on a path of \
         {total} levels, difficulty tier: {tier}. {guidance}\n\
         Create a riddle with three possible answers, exactly one of which is correct. \
         Make it interesting and unique every time, and keep every answer short.\n\
         Respond with JSON only, in this format:\n\
         {{\"question\": \"\", \"choices\": [\"\", \"\", \"\"], \"correctIndex\": 0}}",
        tier = request.tier,
        guidance = request.tier.guidance(),
    )
}
