use splitledger_application::Expense;

/// Renders the generator prompt for one expense.
///
/// Group members beyond the participant list are included as context
/// only; the reconciler drops anyone outside the declared participants
/// no matter what the generator answers.
pub fn suggestion_prompt(expense: &Expense, group_members: &[String]) -> String {
    format!(
        "You are an intelligent expense splitter. Suggest a fair split of an expense \
         among its participants.\n\
         \n\
         Expense details:\n\
         Description: {description}\n\
         Total amount: {amount}\n\
         Paid by: {paid_by}\n\
         Participants: {participants}\n\
         All group members (context only, participants are a subset): {members}\n\
         \n\
         Reply with a single JSON object mapping participant usernames to the amount \
         they owe, with 2 decimal places. The amounts must sum exactly to the total. \
         Split equally unless the description implies otherwise. Output only the JSON \
         object, no extra text.",
        description = expense.description,
        amount = expense.amount,
        paid_by = expense.paid_by,
        participants = expense.participants.join(", "),
        members = group_members.join(", "),
    )
}
