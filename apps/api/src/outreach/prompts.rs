// LLM prompt templates for the outreach module.

/// Initial LinkedIn message prompt.
/// Replace: {grounding_instruction}, {resume_bullets}, {opening}, {closing},
///          {target_min}, {target_max}, {char_limit}
pub const LINKEDIN_PROMPT_TEMPLATE: &str = "\
Write a LinkedIn connection request message from a job seeker to a recruiter.\n\
\n\
{grounding_instruction}\n\
\n\
CANDIDATE BACKGROUND:\n\
{resume_bullets}\n\
\n\
STRUCTURE (follow exactly):\n\
1. Start with this exact sentence: \"{opening}\"\n\
2. Then 2-3 sentences about the candidate's background. Mention their college, \
a company they worked at, and one or two relevant skills.\n\
3. End with this exact sentence: \"{closing}\"\n\
\n\
LENGTH: between {target_min} and {target_max} characters including spaces. \
NEVER exceed {char_limit} characters.\n\
\n\
Return ONLY the message text. No quotes, no labels, no line breaks.";

/// Corrective prompt for a message that came back shorter than the window.
/// Replace: {message}, {length}, {target_min}, {target_max}, {shortfall},
///          {resume_bullets}, {opening}, {closing}
pub const LINKEDIN_TOO_SHORT_TEMPLATE: &str = "\
The LinkedIn message below is TOO SHORT: {length} characters. It must be between \
{target_min} and {target_max} characters.\n\
\n\
MESSAGE:\n\
{message}\n\
\n\
Add about {shortfall} characters by expanding the background sentences with one more \
concrete detail from the candidate background (a project, a technology, or a result).\n\
\n\
CANDIDATE BACKGROUND:\n\
{resume_bullets}\n\
\n\
Keep the opening sentence \"{opening}\" and the closing sentence \"{closing}\" unchanged.\n\
Return ONLY the revised message text.";

/// Corrective prompt for a message that came back longer than the window.
/// Replace: {message}, {length}, {target_min}, {target_max}, {excess},
///          {char_limit}, {opening}, {closing}
pub const LINKEDIN_TOO_LONG_TEMPLATE: &str = "\
The LinkedIn message below is TOO LONG: {length} characters. It must be between \
{target_min} and {target_max} characters and can NEVER exceed {char_limit}.\n\
\n\
MESSAGE:\n\
{message}\n\
\n\
Remove about {excess} characters: shorten the background sentences, drop filler words, \
and merge clauses. Do not cut a sentence in half.\n\
\n\
Keep the opening sentence \"{opening}\" and the closing sentence \"{closing}\" unchanged.\n\
Return ONLY the revised message text.";

pub const LINKEDIN_CLOSING: &str = "I'd love to connect and learn more about the opportunity.";

/// Email prompt. Replace: {grounding_instruction}, {recruiter_name}, {recruiter_title},
/// {company}, {job_titles}, {job_type}, {resume_bullets}, {sender_name}
pub const EMAIL_PROMPT_TEMPLATE: &str = "\
Write a short cold email from a job seeker to a recruiter.\n\
\n\
{grounding_instruction}\n\
\n\
RECRUITER: {recruiter_name} ({recruiter_title}) at {company}\n\
ROLES OF INTEREST: {job_titles}\n\
ROLE TYPE: {job_type}\n\
\n\
CANDIDATE BACKGROUND:\n\
{resume_bullets}\n\
\n\
FORMAT (follow exactly, including the markers):\n\
<<<BEGIN>>>\n\
SUBJECT: <one line, under 10 words>\n\
BODY:\n\
Hi <recruiter first name>,\n\
\n\
<one or two sentences naming the roles and why the candidate is reaching out>\n\
\n\
- <bullet: a relevant qualification, at most 12 words>\n\
- <bullet: a relevant qualification, at most 12 words>\n\
- <optional third bullet, at most 12 words>\n\
\n\
<one sentence asking for a short conversation>\n\
\n\
Best regards,\n\
{sender_name}\n\
<<<END>>>\n\
\n\
RULES: 2-3 bullets only. Body under 150 words. Nothing outside the markers.";
